//! RX and TX datapaths between the transceiver and the system clock domain.
//!
//! Each datapath is split into one module per clock domain. The two modules share nothing but a dual-clock
//! FIFO, so each can be stepped by its own clock.

use pipeflow_std::fifo::async_fifo;

use crate::constants::datapath::CDC_DEPTH;
use crate::*;

/// RX datapath.
///
/// Transceiver RX domain: upconverter, CDC write. System domain: CDC read, output register, SKP remover, word
/// aligner.
#[derive(Debug)]
pub struct RxDatapath<const W: usize> {
    /// Transceiver RX domain half.
    pub link: Module<VrChannel<Word<W>>, ()>,

    /// System domain half.
    pub sys: Module<(), VrChannel<SysWord>>,
}

/// TX datapath.
///
/// System domain: SKP inserter, CDC write. Transceiver TX domain: CDC read, output register, downconverter.
#[derive(Debug)]
pub struct TxDatapath<const W: usize> {
    /// System domain half.
    pub sys: Module<VrChannel<SysWord>, ()>,

    /// Transceiver TX domain half.
    pub link: Module<(), VrChannel<Word<W>>>,
}

/// Creates an RX datapath with the default word aligner.
pub fn rx<const W: usize>() -> RxDatapath<W> { rx_with_aligner(WordAligner::new()) }

/// Creates an RX datapath with the given word aligner.
pub fn rx_with_aligner<const W: usize>(aligner: WordAligner) -> RxDatapath<W> {
    let (write, read) = async_fifo::<SysWord, CDC_DEPTH>();

    let link = Machine::new(Upconverter::<W>::new()).chain(write).build("rx_link");
    let sys = read
        .chain(Machine::new(BufferVr::new()))
        .chain(Machine::new(SkpRemover::new()))
        .chain(Machine::new(aligner))
        .build("rx_sys");

    RxDatapath { link, sys }
}

/// Creates a TX datapath.
pub fn tx<const W: usize>() -> TxDatapath<W> {
    let (write, read) = async_fifo::<SysWord, CDC_DEPTH>();

    let sys = Machine::new(SkpInserter::new()).chain(write).build("tx_sys");
    let link =
        read.chain(Machine::new(BufferVr::new())).chain(Machine::new(Downconverter::<W>::new())).build("tx_link");

    TxDatapath { sys, link }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rx_strips_skp_in_one_domain() {
        let mut datapath = rx::<4>();
        let d = |value| SysWord::repeat(Symbol::data(value));
        let mut input = vec![d(1), SysWord::repeat(Symbol::SKP), d(2), d(3), d(4)].into_iter().peekable();

        let mut output = Vec::new();
        for _ in 0..32 {
            let offer = Valid::from(input.peek().copied());
            if datapath.link.step(&offer, &()).1.ready && offer.valid {
                input.next();
            }
            if let Some(word) = datapath.sys.step(&(), &Ready::new(true)).0.into_option() {
                output.push(word);
            }
        }

        // The aligner keeps the last word as lookahead.
        assert_eq!(output, vec![d(1), d(2), d(3)]);
    }

    #[test]
    fn tx_splits_into_link_words() {
        let mut datapath = tx::<1>();
        let word = SysWord::from_symbols([Symbol::COM, Symbol::data(1), Symbol::data(2), Symbol::data(3)]);

        let mut offer = Valid::valid(word.with_framing(true, true));
        let mut output = Vec::new();
        for _ in 0..16 {
            if datapath.sys.step(&offer, &()).1.ready {
                offer = Valid::invalid();
            }
            if let Some(symbol) = datapath.link.step(&(), &Ready::new(true)).0.into_option() {
                output.push(symbol);
            }
        }

        assert_eq!(output.iter().map(|word| word.lane(0)).collect::<Vec<_>>(), word.symbols());
        assert!(output[0].first && !output[0].last && output[3].last);
    }
}
