//! Multi-domain clock scheduling.
//!
//! Every clock domain ticks on its own rising edges. `Clocks` merges the edges of all domains into a single
//! timeline and reports, instant by instant, which domains tick. Domains ticking at the same instant are
//! reported in the order they were added.

use arrayvec::ArrayVec;
use thiserror::Error;

/// Maximum number of clock domains.
pub const MAX_DOMAINS: usize = 8;

/// Picoseconds per second.
const PS_PER_SEC: u64 = 1_000_000_000_000;

/// Clock scheduling errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    /// No more domains can be added.
    #[error("at most {max} clock domains are supported")]
    TooManyDomains {
        /// Maximum number of domains.
        max: usize,
    },

    /// The domain's period is zero.
    #[error("clock domain `{name}` has a zero period")]
    ZeroPeriod {
        /// Domain name.
        name: String,
    },

    /// The domain's frequency is zero or above 1 THz.
    #[error("clock domain `{name}` has an unsupported frequency of {freq_hz} Hz")]
    Frequency {
        /// Domain name.
        name: String,
        /// Requested frequency.
        freq_hz: u64,
    },

    /// There is nothing to schedule.
    #[error("no clock domain has been added")]
    NoDomains,
}

/// Clock domain identifier, valid for the `Clocks` that returned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomainId(usize);

#[derive(Debug, Clone)]
struct Domain {
    name: String,
    period_ps: u64,
    next_edge_ps: u64,
    ticks: u64,
}

/// Edge scheduler over independently clocked domains.
#[derive(Debug, Clone, Default)]
pub struct Clocks {
    now_ps: u64,
    domains: ArrayVec<Domain, MAX_DOMAINS>,
}

impl Clocks {
    /// Creates an empty scheduler at time zero.
    pub fn new() -> Self { Self::default() }

    /// Adds a domain clocked at `freq_hz`, with its first edge at time zero.
    ///
    /// The period is rounded to the nearest picosecond.
    pub fn add(&mut self, name: &str, freq_hz: u64) -> Result<DomainId, SimError> {
        if freq_hz == 0 || freq_hz > PS_PER_SEC {
            return Err(SimError::Frequency { name: name.to_string(), freq_hz });
        }
        self.add_with_period(name, (PS_PER_SEC + freq_hz / 2) / freq_hz, 0)
    }

    /// Adds a domain with the given period whose first edge is at `phase_ps`.
    pub fn add_with_period(&mut self, name: &str, period_ps: u64, phase_ps: u64) -> Result<DomainId, SimError> {
        if period_ps == 0 {
            return Err(SimError::ZeroPeriod { name: name.to_string() });
        }
        let domain = Domain { name: name.to_string(), period_ps, next_edge_ps: self.now_ps + phase_ps, ticks: 0 };
        self.domains.try_push(domain).map_err(|_| SimError::TooManyDomains { max: MAX_DOMAINS })?;
        tracing::debug!(name, period_ps, phase_ps, "clock domain added");
        Ok(DomainId(self.domains.len() - 1))
    }

    /// Moves to the next instant where at least one domain has a rising edge, and returns those domains.
    pub fn advance(&mut self) -> Result<ArrayVec<DomainId, MAX_DOMAINS>, SimError> {
        let now = self.domains.iter().map(|domain| domain.next_edge_ps).min().ok_or(SimError::NoDomains)?;
        self.now_ps = now;

        let mut ticking = ArrayVec::new();
        for (index, domain) in self.domains.iter_mut().enumerate() {
            if domain.next_edge_ps == now {
                domain.next_edge_ps += domain.period_ps;
                domain.ticks += 1;
                ticking.push(DomainId(index));
            }
        }
        Ok(ticking)
    }

    /// Returns the current time.
    pub fn now_ps(&self) -> u64 { self.now_ps }

    /// Returns the number of rising edges the domain has seen.
    pub fn ticks(&self, id: DomainId) -> u64 { self.domains[id.0].ticks }

    /// Returns the domain's period.
    pub fn period_ps(&self, id: DomainId) -> u64 { self.domains[id.0].period_ps }

    /// Returns the domain's name.
    pub fn name(&self, id: DomainId) -> &str { &self.domains[id.0].name }
}
