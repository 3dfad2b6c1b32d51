use super::*;
use crate::sim::{Access, InitialState, SimConfig, SimHardware};

fn bring_up(hw: &SimHardware, config: &Config) -> Result<ClockControl, Error> {
    ensure_calibrated_internal_oscillator_active(&mut hw.registers(), &mut hw.delay(), config)
}

#[test]
fn every_start_state_ends_on_calibrated_rc() {
    for initial in InitialState::ALL {
        for clkspd in ClockSpeed::ALL {
            for tickspd in TickSpeed::ALL {
                let hw = SimHardware::new(initial, SimConfig::default())
                    .with_dividers(clkspd, tickspd);
                let osc32k = hw.clkcon().osc32k();

                let res = bring_up(&hw, &Config::default());
                assert!(res.is_ok(), "{:?} {:?} {:?}", initial, clkspd, tickspd);

                let clkcon = hw.clkcon();
                assert_eq!(clkcon.osc(), Osc::Rcosc);
                assert_eq!(clkcon.clkspd(), TARGET_CLKSPD);
                assert_eq!(clkcon.tickspd(), tickspd);
                assert_eq!(clkcon.osc32k(), osc32k);
                assert!(hw.sleep().osc_pd());
                assert!(hw.is_calibrated());
                assert!(!hw.is_xosc_running());
                assert_eq!(hw.ordering_violations(), 0);
            }
        }
    }
}

#[test]
fn cold_boot_writes_in_order() {
    let hw = SimHardware::cold_boot();
    bring_up(&hw, &Config::default()).unwrap();

    let writes: Vec<Access> = hw.writes().iter().collect();
    assert_eq!(writes.len(), 4, "{:?}", writes);

    match writes[0] {
        Access::Sleep(w) => assert!(!w.osc_pd()),
        other => panic!("expected SLEEP write, got {:?}", other),
    }
    match writes[1] {
        Access::Clkcon(w) => assert_eq!(w.osc(), Osc::Xosc),
        other => panic!("expected CLKCON write, got {:?}", other),
    }
    match writes[2] {
        Access::Clkcon(w) => {
            assert_eq!(w.osc(), Osc::Rcosc);
            assert_eq!(w.clkspd(), ClockSpeed::Div8);
        }
        other => panic!("expected CLKCON write, got {:?}", other),
    }
    match writes[3] {
        Access::Sleep(w) => assert!(w.osc_pd()),
        other => panic!("expected SLEEP write, got {:?}", other),
    }
}

#[test]
fn cold_boot_waits_for_calibration() {
    let hw = SimHardware::cold_boot();
    bring_up(&hw, &Config::default()).unwrap();
    // Crystal start-up plus the full calibration window.
    assert!(hw.now_us() >= 300 + CALIBRATION_WORST_CASE_US as u64);
    assert!(hw.now_us() < DEFAULT_TIMEOUT_US as u64);
}

#[test]
fn second_run_leaves_registers_unchanged() {
    let hw = SimHardware::cold_boot();
    bring_up(&hw, &Config::default()).unwrap();
    let (clkcon, sleep) = (hw.clkcon(), hw.sleep());

    bring_up(&hw, &Config::default()).unwrap();
    assert_eq!(hw.clkcon(), clkcon);
    assert_eq!(hw.sleep(), sleep);
    assert_eq!(hw.ordering_violations(), 0);
}

#[test]
fn already_calibrated_still_runs_full_sequence() {
    let hw = SimHardware::new(InitialState::CalibratedRcCrystalOff, SimConfig::default());
    bring_up(&hw, &Config::default()).unwrap();

    let clock_writes = hw.writes().iter().filter(Access::is_clock_access).count();
    assert_eq!(clock_writes, 4);
    assert!(read_clocks_from_hw(&hw.registers()).is_calibrated_rc_target());
}

#[test]
fn crystal_that_never_stabilizes_times_out() {
    let hw = SimHardware::new(
        InitialState::ColdBoot,
        SimConfig {
            xosc_startup_us: None,
            ..SimConfig::default()
        },
    );

    let err = bring_up(&hw, &Config::default()).unwrap_err();
    assert_eq!(
        err,
        Error::OscillatorStabilizationTimeout {
            stage: Stage::CrystalStable,
            waited_us: DEFAULT_TIMEOUT_US,
        }
    );
    // Nothing was switched.
    assert_eq!(hw.clkcon().osc(), Osc::Rcosc);
    assert_eq!(hw.writes().len(), 1);
}

#[test]
fn slow_crystal_switch_times_out() {
    let hw = SimHardware::new(
        InitialState::ColdBoot,
        SimConfig {
            switch_us: DEFAULT_TIMEOUT_US + 1_000,
            ..SimConfig::default()
        },
    );

    match bring_up(&hw, &Config::default()) {
        Err(Error::OscillatorStabilizationTimeout { stage, .. }) => {
            assert_eq!(stage, Stage::SwitchToCrystal)
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn unfinished_calibration_keeps_crystal_powered() {
    let hw = SimHardware::new(
        InitialState::ColdBoot,
        SimConfig {
            calibration_us: None,
            ..SimConfig::default()
        },
    );

    match bring_up(&hw, &Config::default()) {
        Err(Error::OscillatorStabilizationTimeout { stage, .. }) => {
            assert_eq!(stage, Stage::SwitchToInternal)
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(hw.clkcon().osc(), Osc::Xosc);
    assert!(!hw.sleep().osc_pd());
    assert!(hw.is_xosc_running());
    assert_eq!(hw.ordering_violations(), 0);
}

#[test]
fn timeout_follows_config() {
    const CONFIG: Config = ConfigBuilder::new()
        .with_timeout_us(500)
        .with_poll_interval_us(50)
        .checked();

    let hw = SimHardware::cold_boot();
    let err = bring_up(&hw, &CONFIG).unwrap_err();
    // 500 us covers crystal start-up but not calibration.
    assert_eq!(
        err,
        Error::OscillatorStabilizationTimeout {
            stage: Stage::SwitchToInternal,
            waited_us: 500,
        }
    );
}

#[test]
#[should_panic(expected = "poll interval must not be zero")]
fn zero_poll_interval_is_rejected() {
    ConfigBuilder::new().with_poll_interval_us(0).checked();
}

#[test]
#[should_panic(expected = "poll interval exceeds the timeout")]
fn poll_interval_above_timeout_is_rejected() {
    ConfigBuilder::new()
        .with_timeout_us(10)
        .with_poll_interval_us(20)
        .checked();
}

#[test]
fn init_returns_clock_tokens() {
    let hw = SimHardware::cold_boot();
    let clocks =
        crate::init(&mut hw.registers(), &mut hw.delay(), crate::Config::default()).unwrap();

    assert_eq!(clocks.sysclk.frequency(), TARGET_SYSCLK_FREQ);
    assert_eq!(clocks.ref_clk.frequency(), CLK_REF_FREQ);
    assert_eq!(hw.clkcon().osc(), Osc::Rcosc);
}

#[test]
#[cfg(not(any(feature = "cc1111", feature = "cc2511")))]
fn target_sysclk_is_reference_over_eight() {
    use crate::time::Hertz;

    assert_eq!(CLK_REF_FREQ, Hertz(26_000_000));
    assert_eq!(TARGET_SYSCLK_FREQ, Hertz(3_250_000));
    assert_eq!(CLK_REF_FREQ / ClockSpeed::Div8, TARGET_SYSCLK_FREQ);
    assert_eq!(CLK_HSRC_FREQ, Hertz(13_000_000));
}

#[test]
#[cfg(any(feature = "cc1111", feature = "cc2511"))]
fn usb_parts_use_24mhz_reference() {
    use crate::time::Hertz;

    assert_eq!(CLK_REF_FREQ, Hertz(24_000_000));
    assert_eq!(TARGET_SYSCLK_FREQ, Hertz(3_000_000));
    assert_eq!(CLK_HSRC_FREQ, Hertz(12_000_000));
    assert_eq!(RefClk::new().frequency(), Hertz(24_000_000));
}

#[test]
fn reset_state_reads_back() {
    let hw = SimHardware::cold_boot();
    let clocks = read_clocks_from_hw(&hw.registers());

    assert_eq!(clocks.source, Osc::Rcosc);
    assert_eq!(clocks.sysclk, CLK_REF_FREQ / ClockSpeed::Div2);
    assert_eq!(clocks.tick, CLK_REF_FREQ / TickSpeed::Div2);
    assert!(!clocks.xosc_powered);
    assert!(!clocks.xosc_stable);
    assert!(clocks.hsrc_stable);
    assert!(!clocks.is_calibrated_rc_target());
}

#[test]
fn rc_sysclk_saturates_at_rc_frequency() {
    let hw = SimHardware::cold_boot().with_dividers(ClockSpeed::Div1, TickSpeed::Div1);
    assert_eq!(get_sysclk_freq(&hw.registers()), CLK_HSRC_FREQ);

    let hw = SimHardware::new(InitialState::CrystalActive, SimConfig::default())
        .with_dividers(ClockSpeed::Div1, TickSpeed::Div1);
    assert_eq!(get_sysclk_freq(&hw.registers()), CLK_XOSC_FREQ);
    assert!(is_xosc_powered(&hw.registers()));
}
