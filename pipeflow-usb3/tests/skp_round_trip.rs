use pipeflow::*;
use pipeflow_std::*;
use pipeflow_usb3::*;
use proptest::prelude::*;

/// Framed words of `packets`, back to back. Every packet starts with a comma.
fn frame(packets: &[Vec<[u8; 4]>]) -> Vec<SysWord> {
    packets
        .iter()
        .flat_map(|packet| {
            packet.iter().enumerate().map(move |(index, data)| {
                let mut word = SysWord::from_symbols(data.map(Symbol::data));
                if index == 0 {
                    word.set_lane(0, Symbol::COM);
                }
                word.with_framing(index == 0, index + 1 == packet.len())
            })
        })
        .collect()
}

struct RoundTrip {
    received: Vec<SysWord>,
    inserted: usize,
}

/// Sends `words` through an SKP inserter feeding an SKP remover.
fn round_trip(words: &[SysWord], gaps: &[bool], stalls: &[bool]) -> RoundTrip {
    let mut inserter = Machine::new(SkpInserter::new());
    let mut remover = Machine::new(SkpRemover::new());

    let mut pending = words.iter().copied().peekable();
    let mut in_packet = false;
    let mut inserted = 0;
    let mut received = Vec::new();

    for tick in 0.. {
        if received.len() == words.len() {
            break;
        }
        assert!(tick < 64 * words.len() + 256, "stalled after {} words", received.len());

        let offer = if gaps[tick % gaps.len()] { Valid::invalid() } else { Valid::from(pending.peek().copied()) };
        let sink_ready = Ready::new(!stalls[tick % stalls.len()]);

        let mid_bwd = remover.bwd(&sink_ready);
        let (mid_fwd, source_ready) = inserter.step(&offer, &mid_bwd);
        let (output, _) = remover.step(&mid_fwd, &sink_ready);

        if offer.fire(&source_ready) {
            pending.next();
        }
        if mid_fwd.fire(&mid_bwd) {
            let word = mid_fwd.inner;
            if word == SysWord::repeat(Symbol::SKP) {
                assert!(!in_packet, "SKP inserted inside a packet");
                inserted += 1;
            } else if word.last {
                in_packet = false;
            } else if word.first {
                in_packet = true;
            }
        }
        if output.fire(&sink_ready) {
            received.push(output.inner);
        }
    }

    RoundTrip { received, inserted }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn reproduces_framed_stream(
        packets in prop::collection::vec(prop::collection::vec(any::<[u8; 4]>(), 1..12), 30..60),
        gaps in prop::collection::vec(prop::bool::weighted(0.2), 1..16),
        stalls in prop::collection::vec(prop::bool::weighted(0.3), 1..16),
    ) {
        let mut gaps = gaps;
        gaps.push(false);
        let mut stalls = stalls;
        stalls.push(false);

        let words = frame(&packets);
        let result = round_trip(&words, &gaps, &stalls);

        prop_assert_eq!(&result.received, &words);
        prop_assert!(result.inserted >= (words.len() / 176).saturating_sub(1));
    }
}

#[test]
fn inserts_between_long_packets() {
    let packets = vec![vec![[0x11; 4]; 100]; 8];
    let words = frame(&packets);
    let result = round_trip(&words, &[false, false, true], &[false]);

    assert_eq!(result.received, words);
    assert_eq!(result.inserted, words.len() / 176);
}
