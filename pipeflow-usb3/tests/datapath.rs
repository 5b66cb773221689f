use std::collections::VecDeque;

use pipeflow::*;
use pipeflow_std::*;
use pipeflow_usb3::*;
use proptest::prelude::*;

/// Periods of the system, transceiver TX and transceiver RX clocks.
#[derive(Debug, Clone, Copy)]
struct Periods {
    sys_ps: u64,
    tx_ps: u64,
    rx_ps: u64,
}

/// Sends `words` over TX and RX datapaths with `W`-symbol transceiver words in loopback.
///
/// The transceiver line is a queue: every word the TX datapath offers is taken, and the RX datapath is offered
/// one word per RX tick when there is one.
fn loopback<const W: usize>(words: &[SysWord], periods: Periods, stalls: &[bool]) -> Vec<SysWord> {
    let mut clocks = Clocks::new();
    let sys = clocks.add_with_period("sys", periods.sys_ps, 0).unwrap();
    let tx_clk = clocks.add_with_period("tx", periods.tx_ps, 500).unwrap();
    let rx_clk = clocks.add_with_period("rx", periods.rx_ps, 1_300).unwrap();

    let mut tx = datapath::tx::<W>();
    let mut rx = datapath::rx::<W>();
    let mut line = VecDeque::<Word<W>>::new();

    // The aligner keeps one word of lookahead.
    let mut pending = words.iter().copied().chain([SysWord::repeat(Symbol::data(0))]).peekable();
    let mut received = Vec::new();

    while received.len() < words.len() {
        assert!(clocks.now_ps() < 1_000 * periods.sys_ps * (words.len() as u64 + 16), "loopback stalled");

        for domain in clocks.advance().unwrap() {
            if domain == sys {
                let offer = Valid::from(pending.peek().copied());
                if tx.sys.step(&offer, &()).1.ready && offer.valid {
                    pending.next();
                }

                let ready = Ready::new(!stalls[clocks.ticks(sys) as usize % stalls.len()]);
                let output = rx.sys.step(&(), &ready).0;
                if output.fire(&ready) {
                    received.push(output.inner);
                }
            } else if domain == tx_clk {
                line.extend(tx.link.step(&(), &Ready::new(true)).0.into_option());
            } else if domain == rx_clk {
                let offer = Valid::from(line.front().copied());
                if rx.link.step(&offer, &()).1.ready && offer.valid {
                    line.pop_front();
                }
            }
        }
    }

    received
}

fn packets(count: usize, len: usize) -> Vec<SysWord> {
    (0..count * len)
        .map(|index| {
            let data = (index as u32).to_le_bytes();
            SysWord::from_symbols(data.map(Symbol::data)).with_framing(index % len == 0, index % len == len - 1)
        })
        .collect()
}

#[test]
fn nominal_rates() {
    let words = packets(40, 10);
    let periods = Periods { sys_ps: 8_000, tx_ps: 4_000, rx_ps: 4_000 };
    assert_eq!(loopback::<2>(&words, periods, &[false]), words);
}

#[test]
fn narrow_transceiver_words() {
    let words = packets(20, 12);
    let periods = Periods { sys_ps: 8_000, tx_ps: 2_000, rx_ps: 1_999 };
    assert_eq!(loopback::<1>(&words, periods, &[false, true]), words);
}

#[test]
fn full_width_transceiver_words() {
    let words = packets(20, 12);
    let periods = Periods { sys_ps: 6_400, tx_ps: 8_000, rx_ps: 8_004 };
    assert_eq!(loopback::<4>(&words, periods, &[false]), words);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn mismatched_clocks(
        count in 10usize..40,
        len in 1usize..16,
        tx_ps in 3_980u64..4_020,
        rx_ps in 3_980u64..4_020,
        stalls in prop::collection::vec(prop::bool::weighted(0.25), 1..8),
    ) {
        let mut stalls = stalls;
        stalls.push(false);

        let words = packets(count, len);
        let periods = Periods { sys_ps: 8_000, tx_ps, rx_ps };
        prop_assert_eq!(loopback::<2>(&words, periods, &stalls), words);
    }
}
