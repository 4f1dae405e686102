//! Admin Operations
//!
//! Every operation here is gated on the caller being the current admin
//! and fails with `UNAUTHORIZED` otherwise, leaving state untouched.
//! Successful mutations are recorded in the event log.

use flashstack_common::{
    access_control::require_admin,
    errors::{FlashStackError, FlashStackResult},
    events::FlashStackEvent,
    flash::FlashReceiver,
    token_ops::{CollateralOracle, TokenLedger},
    types::{CallContext, Principal},
};

use crate::FlashStack;

impl<L, O> FlashStack<L, O>
where
    L: TokenLedger + Clone,
    O: CollateralOracle,
{
    // ============ Pause Switch ============

    pub fn pause(&mut self, ctx: &CallContext) -> FlashStackResult<bool> {
        require_admin(&self.config, &ctx.sender)?;
        self.config.paused = true;
        self.events.emit(FlashStackEvent::ProtocolPaused {
            by: ctx.sender,
            block_height: ctx.block_height,
        });
        Ok(true)
    }

    pub fn unpause(&mut self, ctx: &CallContext) -> FlashStackResult<bool> {
        require_admin(&self.config, &ctx.sender)?;
        self.config.paused = false;
        self.events.emit(FlashStackEvent::ProtocolUnpaused {
            by: ctx.sender,
            block_height: ctx.block_height,
        });
        Ok(true)
    }

    // ============ Parameters ============

    /// Set the flash fee in basis points (at most 100).
    ///
    /// An out-of-range fee is reported as `UNAUTHORIZED`, not
    /// `INVALID_AMOUNT`, to keep the established error contract.
    pub fn set_fee(&mut self, ctx: &CallContext, new_fee_bps: u64) -> FlashStackResult<bool> {
        require_admin(&self.config, &ctx.sender)?;
        let old_fee_bps = self.config.fee_basis_points;
        self.config
            .set_fee_basis_points(new_fee_bps)
            .map_err(|_| FlashStackError::Unauthorized)?;

        self.events.emit(FlashStackEvent::FeeUpdated {
            old_fee_bps,
            new_fee_bps,
            block_height: ctx.block_height,
        });
        Ok(true)
    }

    pub fn set_max_single_loan(&mut self, ctx: &CallContext, new_limit: u64) -> FlashStackResult<bool> {
        require_admin(&self.config, &ctx.sender)?;
        let old_limit = self.config.max_single_loan;
        self.config.set_max_single_loan(new_limit)?;

        self.events.emit(FlashStackEvent::MaxSingleLoanUpdated {
            old_limit,
            new_limit,
            block_height: ctx.block_height,
        });
        Ok(true)
    }

    pub fn set_max_block_volume(&mut self, ctx: &CallContext, new_limit: u64) -> FlashStackResult<bool> {
        require_admin(&self.config, &ctx.sender)?;
        let old_limit = self.config.max_block_volume;
        self.config.set_max_block_volume(new_limit)?;

        self.events.emit(FlashStackEvent::MaxBlockVolumeUpdated {
            old_limit,
            new_limit,
            block_height: ctx.block_height,
        });
        Ok(true)
    }

    // ============ Receiver Whitelist ============

    /// Whitelist `receiver`. Idempotent; an event is only emitted when the
    /// set changes.
    pub fn add_approved_receiver(&mut self, ctx: &CallContext, receiver: Principal) -> FlashStackResult<bool> {
        require_admin(&self.config, &ctx.sender)?;
        if self.config.approved_receivers.approve(receiver) {
            self.events.emit(FlashStackEvent::ReceiverApproved {
                receiver,
                block_height: ctx.block_height,
            });
        }
        Ok(true)
    }

    pub fn remove_approved_receiver(&mut self, ctx: &CallContext, receiver: &Principal) -> FlashStackResult<bool> {
        require_admin(&self.config, &ctx.sender)?;
        if self.config.approved_receivers.remove(receiver) {
            self.events.emit(FlashStackEvent::ReceiverRemoved {
                receiver: *receiver,
                block_height: ctx.block_height,
            });
        }
        Ok(true)
    }

    // ============ Admin Transfer ============

    /// Hand the admin role to `new_admin`, effective immediately
    pub fn set_admin(&mut self, ctx: &CallContext, new_admin: Principal) -> FlashStackResult<bool> {
        require_admin(&self.config, &ctx.sender)?;
        let old_admin = self.config.admin;
        self.config.admin = new_admin;

        self.events.emit(FlashStackEvent::AdminChanged {
            old_admin,
            new_admin,
            block_height: ctx.block_height,
        });
        Ok(true)
    }

    // ============ Receiver Deployment ============

    /// Deploy a receiver contract at `principal`. Open to anyone; the
    /// receiver still needs whitelisting before it can take a loan.
    ///
    /// Returns false if `principal` already holds a receiver, which is
    /// left untouched.
    pub fn deploy_receiver(&mut self, principal: Principal, receiver: Box<dyn FlashReceiver>) -> bool {
        self.receivers.deploy(principal, receiver)
    }
}

#[cfg(test)]
mod tests {
    use flashstack_common::{EventType, FlashStackError, Principal};

    use crate::integration_tests::{harness, ADMIN, ALICE, RECEIVER};

    #[test]
    fn test_non_admin_rejected_without_side_effects() {
        let mut h = harness();
        let alice = h.ctx(ALICE);
        let before_events = h.engine.events().len();

        assert_eq!(h.engine.pause(&alice), Err(FlashStackError::Unauthorized));
        assert_eq!(h.engine.unpause(&alice), Err(FlashStackError::Unauthorized));
        assert_eq!(h.engine.set_fee(&alice, 10), Err(FlashStackError::Unauthorized));
        assert_eq!(h.engine.set_max_single_loan(&alice, 1), Err(FlashStackError::Unauthorized));
        assert_eq!(h.engine.set_max_block_volume(&alice, 1), Err(FlashStackError::Unauthorized));
        assert_eq!(h.engine.add_approved_receiver(&alice, ALICE), Err(FlashStackError::Unauthorized));
        assert_eq!(h.engine.remove_approved_receiver(&alice, &RECEIVER), Err(FlashStackError::Unauthorized));
        assert_eq!(h.engine.set_admin(&alice, ALICE), Err(FlashStackError::Unauthorized));

        assert!(!h.engine.is_paused());
        assert_eq!(h.engine.get_fee_basis_points(), 5);
        assert_eq!(h.engine.get_admin(), ADMIN);
        assert!(h.engine.is_approved_receiver(&RECEIVER));
        assert_eq!(h.engine.events().len(), before_events);
    }

    #[test]
    fn test_pause_and_unpause() {
        let mut h = harness();
        let admin = h.ctx(ADMIN);

        assert_eq!(h.engine.pause(&admin), Ok(true));
        assert!(h.engine.is_paused());
        assert!(h.engine.get_stats().paused);

        assert_eq!(h.engine.unpause(&admin), Ok(true));
        assert!(!h.engine.is_paused());

        assert_eq!(h.engine.events().filter_by_type(EventType::ProtocolPaused).len(), 1);
        assert_eq!(h.engine.events().filter_by_type(EventType::ProtocolUnpaused).len(), 1);
    }

    #[test]
    fn test_set_fee_bounds() {
        let mut h = harness();
        let admin = h.ctx(ADMIN);

        assert_eq!(h.engine.set_fee(&admin, 100), Ok(true));
        assert_eq!(h.engine.get_fee_basis_points(), 100);
        assert_eq!(h.engine.set_fee(&admin, 0), Ok(true));
        assert_eq!(h.engine.calculate_fee(1_000_000_000), 0);
    }

    #[test]
    fn test_set_fee_above_max_reports_unauthorized() {
        // Established contract: an out-of-range fee from the admin is u102,
        // not u104.
        let mut h = harness();
        let admin = h.ctx(ADMIN);

        let err = h.engine.set_fee(&admin, 101).unwrap_err();
        assert_eq!(err, FlashStackError::Unauthorized);
        assert_eq!(err.code(), 102);
        assert_eq!(h.engine.get_fee_basis_points(), 5);
    }

    #[test]
    fn test_zero_limits_rejected() {
        let mut h = harness();
        let admin = h.ctx(ADMIN);

        assert_eq!(h.engine.set_max_single_loan(&admin, 0).unwrap_err().code(), 104);
        assert_eq!(h.engine.set_max_block_volume(&admin, 0).unwrap_err().code(), 104);
        assert_eq!(h.engine.get_max_single_loan(), 5_000_000_000);
        assert_eq!(h.engine.get_max_block_volume(), 25_000_000_000);

        assert_eq!(h.engine.set_max_single_loan(&admin, 1), Ok(true));
        assert_eq!(h.engine.get_max_single_loan(), 1);
    }

    #[test]
    fn test_whitelist_idempotent() {
        let mut h = harness();
        let admin = h.ctx(ADMIN);
        let approvals = h.engine.events().filter_by_type(EventType::ReceiverApproved).len();

        assert_eq!(h.engine.add_approved_receiver(&admin, RECEIVER), Ok(true));
        assert!(h.engine.is_approved_receiver(&RECEIVER));
        assert_eq!(
            h.engine.events().filter_by_type(EventType::ReceiverApproved).len(),
            approvals
        );

        assert_eq!(h.engine.remove_approved_receiver(&admin, &RECEIVER), Ok(true));
        assert_eq!(h.engine.remove_approved_receiver(&admin, &RECEIVER), Ok(true));
        assert!(!h.engine.is_approved_receiver(&RECEIVER));
        assert_eq!(h.engine.events().filter_by_type(EventType::ReceiverRemoved).len(), 1);
    }

    #[test]
    fn test_admin_transfer() {
        let mut h = harness();
        let admin = h.ctx(ADMIN);
        let alice = h.ctx(ALICE);
        let other: Principal = [30u8; 32];

        assert_eq!(h.engine.set_admin(&admin, ALICE), Ok(true));
        assert_eq!(h.engine.get_admin(), ALICE);

        // Old admin loses every privilege at once
        let denied = Err(FlashStackError::Unauthorized);
        assert_eq!(h.engine.pause(&admin), denied);
        assert_eq!(h.engine.unpause(&admin), denied);
        assert_eq!(h.engine.set_fee(&admin, 10), denied);
        assert_eq!(h.engine.set_max_single_loan(&admin, 1), denied);
        assert_eq!(h.engine.set_max_block_volume(&admin, 1), denied);
        assert_eq!(h.engine.add_approved_receiver(&admin, other), denied);
        assert_eq!(h.engine.remove_approved_receiver(&admin, &RECEIVER), denied);
        assert_eq!(h.engine.set_admin(&admin, ADMIN), denied);
        assert_eq!(h.engine.get_admin(), ALICE);
        assert!(!h.engine.is_paused());

        // New admin can use all of them
        assert_eq!(h.engine.pause(&alice), Ok(true));
        assert_eq!(h.engine.unpause(&alice), Ok(true));
        assert_eq!(h.engine.set_fee(&alice, 10), Ok(true));
        assert_eq!(h.engine.set_max_single_loan(&alice, 1_000), Ok(true));
        assert_eq!(h.engine.set_max_block_volume(&alice, 2_000), Ok(true));
        assert_eq!(h.engine.add_approved_receiver(&alice, other), Ok(true));
        assert_eq!(h.engine.remove_approved_receiver(&alice, &RECEIVER), Ok(true));

        assert_eq!(h.engine.get_fee_basis_points(), 10);
        assert_eq!(h.engine.get_max_single_loan(), 1_000);
        assert_eq!(h.engine.get_max_block_volume(), 2_000);
        assert!(h.engine.is_approved_receiver(&other));
        assert!(!h.engine.is_approved_receiver(&RECEIVER));

        // And hand the role on again
        assert_eq!(h.engine.set_admin(&alice, other), Ok(true));
        assert_eq!(h.engine.get_admin(), other);
        assert_eq!(h.engine.pause(&alice), denied);
    }
}
