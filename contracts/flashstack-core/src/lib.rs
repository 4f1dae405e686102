//! FlashStack Core - Flash Mint Settlement Engine
//!
//! Issues sBTC flash loans backed by collateral the borrower has locked
//! elsewhere. A loan is minted, handed to a whitelisted receiver, and
//! burned again (principal plus fee) in one atomic unit.
//!
//! ## Core Operations
//!
//! - **flash_mint**: validate, mint, call back, burn, record
//! - **Admin**: pause switch, fee, loan ceilings, whitelist, admin transfer
//! - **Reads**: fee quotes, collateral requirements, block volume, stats
//!
//! ## State Model
//!
//! `FlashStack` owns every piece of protocol state and is passed around
//! explicitly. Each mutating call takes a
//! [`CallContext`](flashstack_common::types::CallContext) carrying the
//! sender and the current block height.

use flashstack_common::{
    circuit_breaker::{remaining_block_capacity, BlockVolumeLedger},
    config::ProtocolConfig,
    events::EventLog,
    math::{calculate_fee, max_flash_amount, min_collateral},
    token_ops::{CollateralOracle, TokenLedger},
    types::{BlockHeight, Principal, ProtocolStats, StatsView, UserStats},
    FlashStackResult,
};

pub mod admin;
pub mod oracle;
pub mod registry;
pub mod settlement;
pub mod snapshot;

pub use oracle::LockedCollateralBook;
pub use registry::ReceiverRegistry;
pub use snapshot::ProtocolSnapshot;


// ============ Engine State ============

/// The settlement engine and everything it owns
pub struct FlashStack<L, O> {
    /// Principal the engine mints and burns as
    identity: Principal,
    config: ProtocolConfig,
    stats: ProtocolStats,
    block_volumes: BlockVolumeLedger,
    ledger: L,
    oracle: O,
    receivers: ReceiverRegistry,
    events: EventLog,
}

impl<L, O> FlashStack<L, O>
where
    L: TokenLedger + Clone,
    O: CollateralOracle,
{
    /// Fresh engine with default parameters.
    ///
    /// `identity` must be registered as the ledger's flash minter before
    /// any loan can settle.
    pub fn new(identity: Principal, admin: Principal, ledger: L, oracle: O) -> Self {
        Self {
            identity,
            config: ProtocolConfig::new(admin),
            stats: ProtocolStats::default(),
            block_volumes: BlockVolumeLedger::new(),
            ledger,
            oracle,
            receivers: ReceiverRegistry::new(),
            events: EventLog::new(),
        }
    }

    pub fn identity(&self) -> Principal {
        self.identity
    }

    // ============ Configuration Reads ============

    pub fn get_admin(&self) -> Principal {
        self.config.admin
    }

    pub fn is_paused(&self) -> bool {
        self.config.paused
    }

    pub fn get_fee_basis_points(&self) -> u64 {
        self.config.fee_basis_points
    }

    /// Fee the current rate charges on `amount`
    pub fn calculate_fee(&self, amount: u64) -> u64 {
        calculate_fee(amount, self.config.fee_basis_points)
    }

    pub fn get_max_single_loan(&self) -> u64 {
        self.config.max_single_loan
    }

    pub fn get_max_block_volume(&self) -> u64 {
        self.config.max_block_volume
    }

    pub fn is_approved_receiver(&self, receiver: &Principal) -> bool {
        self.config.approved_receivers.is_approved(receiver)
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    // ============ Collateral Reads ============

    /// Collateral required to borrow `amount` (3x)
    pub fn get_min_collateral(&self, amount: u64) -> u64 {
        min_collateral(amount)
    }

    /// Largest loan `collateral` supports
    pub fn get_max_flash_amount(&self, collateral: u64) -> u64 {
        max_flash_amount(collateral)
    }

    pub fn get_locked_collateral(&self, owner: &Principal) -> FlashStackResult<u64> {
        self.oracle.locked_collateral(owner)
    }

    pub fn get_user_stats(&self, owner: &Principal) -> FlashStackResult<UserStats> {
        let locked_collateral = self.oracle.locked_collateral(owner)?;
        Ok(UserStats {
            locked_collateral,
            max_flash_amount: max_flash_amount(locked_collateral),
        })
    }

    // ============ Volume & Stats Reads ============

    /// Principal settled at `height`
    pub fn get_block_volume(&self, height: BlockHeight) -> u64 {
        self.block_volumes.volume_at(height)
    }

    pub fn get_remaining_block_capacity(&self, height: BlockHeight) -> u64 {
        remaining_block_capacity(&self.config, &self.block_volumes, height)
    }

    pub fn get_stats(&self) -> StatsView {
        StatsView {
            total_flash_mints: self.stats.total_flash_mints,
            total_volume: self.stats.total_volume,
            total_fees_collected: self.stats.total_fees_collected,
            current_fee_bp: self.config.fee_basis_points,
            paused: self.config.paused,
        }
    }

    pub fn stats(&self) -> &ProtocolStats {
        &self.stats
    }

    pub fn block_volumes(&self) -> &BlockVolumeLedger {
        &self.block_volumes
    }

    // ============ Collaborators ============

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Ledger access for setup outside a settlement (funding, registration)
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    pub fn receivers(&self) -> &ReceiverRegistry {
        &self.receivers
    }
}
