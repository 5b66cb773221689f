use pipeflow::*;
use pipeflow_usb3::lfps::*;

/// Pulses of a partner's Polling detector, in nanoseconds, while the local transceiver sends Polling.LFPS.
///
/// The line is in electrical idle whenever the local transceiver says so; the partner samples it on its own
/// clock.
fn partner_pulses(local_hz: u64, partner_hz: u64, duration_ns: u64, control: LfpsControl) -> Vec<u64> {
    let mut clocks = Clocks::new();
    let local_clk = clocks.add("local", local_hz).unwrap();
    let partner_clk = clocks.add_with_period("partner", 1_000_000_000_000 / partner_hz, 1_700).unwrap();

    let mut local = LfpsTransceiver::<2>::new(local_hz, 30_000_000).unwrap();
    let mut partner = LfpsTransceiver::<2>::new(partner_hz, 30_000_000).unwrap();
    let mut line_idle = true;

    let mut pulses = Vec::new();
    while clocks.now_ps() < duration_ns * 1_000 {
        for domain in clocks.advance().unwrap() {
            if domain == local_clk {
                line_idle = local.step(&control, &()).0.drive.line().idle;
            } else if domain == partner_clk {
                let listen = LfpsControl { rx_idle: line_idle, tx_polling: false, tx_idle: true };
                if partner.step(&listen, &()).0.rx_polling {
                    pulses.push(clocks.now_ps() / 1_000);
                }
            }
        }
    }
    pulses
}

const POLLING: LfpsControl = LfpsControl { rx_idle: true, tx_polling: true, tx_idle: false };

fn check_once_per_cycle(local_hz: u64, partner_hz: u64) {
    let pulses = partner_pulses(local_hz, partner_hz, 55_000, POLLING);

    // Every cycle after the first is detected.
    assert_eq!(pulses.len(), 5, "pulses at {pulses:?} ns");
    for pair in pulses.windows(2) {
        let interval = pair[1] - pair[0];
        assert!((9_000..=11_000).contains(&interval), "pulses at {pulses:?} ns");
    }
}

#[test]
fn same_clock() { check_once_per_cycle(125_000_000, 125_000_000) }

#[test]
fn faster_partner() { check_once_per_cycle(125_000_000, 250_000_000) }

#[test]
fn slower_partner() { check_once_per_cycle(250_000_000, 125_000_000) }

#[test]
fn unrelated_clocks() { check_once_per_cycle(125_000_000, 156_250_000) }

#[test]
fn steady_line_is_not_polling() {
    let idle = LfpsControl { rx_idle: true, tx_polling: false, tx_idle: true };
    assert!(partner_pulses(125_000_000, 125_000_000, 40_000, idle).is_empty());

    let active = LfpsControl { tx_idle: false, ..idle };
    assert!(partner_pulses(125_000_000, 125_000_000, 40_000, active).is_empty());
}

#[test]
fn polling_count_tracks_cycles() {
    let mut lfps = LfpsTransceiver::<2>::new(125_000_000, 30_000_000).unwrap();
    let counts = (0..10_020).map(|_| lfps.step(&POLLING, &()).0.tx_count).collect::<Vec<_>>();

    // One Polling cycle every 1252 ticks of 8 ns.
    assert_eq!(counts[1251], 0);
    assert_eq!(counts[1252], 1);
    assert_eq!(counts[10_016], 8);

    let released = LfpsControl { tx_polling: false, ..POLLING };
    let status = (0..1300).map(|_| lfps.step(&released, &()).0).last().unwrap();
    assert_eq!(status.tx_count, 0);
    assert_eq!(status.drive, TxDrive::Request { idle: false });
}
