//! Protocol Events for FlashStack
//!
//! Every committed flash mint and every admin mutation leaves an event in
//! the log. Rejected calls and aborted settlements emit nothing.

use crate::types::{BlockHeight, Principal};
use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Event types for indexing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    // Flash Events (0x01 - 0x1F)
    FlashMint = 0x01,

    // Receiver Events (0x20 - 0x3F)
    ReceiverApproved = 0x20,
    ReceiverRemoved = 0x21,

    // Parameter Events (0x40 - 0x5F)
    FeeUpdated = 0x40,
    MaxSingleLoanUpdated = 0x41,
    MaxBlockVolumeUpdated = 0x42,

    // Protocol Events (0x80 - 0x9F)
    ProtocolPaused = 0x80,
    ProtocolUnpaused = 0x81,
    AdminChanged = 0x82,
}

/// Main event enum containing all possible protocol events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum FlashStackEvent {
    /// Emitted when a flash mint settles
    FlashMint {
        flash_mint_id: u64,
        borrower: Principal,
        receiver: Principal,
        amount: u64,
        fee: u64,
        block_height: BlockHeight,
    },

    ReceiverApproved {
        receiver: Principal,
        block_height: BlockHeight,
    },

    ReceiverRemoved {
        receiver: Principal,
        block_height: BlockHeight,
    },

    FeeUpdated {
        old_fee_bps: u64,
        new_fee_bps: u64,
        block_height: BlockHeight,
    },

    MaxSingleLoanUpdated {
        old_limit: u64,
        new_limit: u64,
        block_height: BlockHeight,
    },

    MaxBlockVolumeUpdated {
        old_limit: u64,
        new_limit: u64,
        block_height: BlockHeight,
    },

    ProtocolPaused {
        by: Principal,
        block_height: BlockHeight,
    },

    ProtocolUnpaused {
        by: Principal,
        block_height: BlockHeight,
    },

    AdminChanged {
        old_admin: Principal,
        new_admin: Principal,
        block_height: BlockHeight,
    },
}

impl FlashStackEvent {
    /// Get the event type for filtering
    pub fn event_type(&self) -> EventType {
        match self {
            Self::FlashMint { .. } => EventType::FlashMint,
            Self::ReceiverApproved { .. } => EventType::ReceiverApproved,
            Self::ReceiverRemoved { .. } => EventType::ReceiverRemoved,
            Self::FeeUpdated { .. } => EventType::FeeUpdated,
            Self::MaxSingleLoanUpdated { .. } => EventType::MaxSingleLoanUpdated,
            Self::MaxBlockVolumeUpdated { .. } => EventType::MaxBlockVolumeUpdated,
            Self::ProtocolPaused { .. } => EventType::ProtocolPaused,
            Self::ProtocolUnpaused { .. } => EventType::ProtocolUnpaused,
            Self::AdminChanged { .. } => EventType::AdminChanged,
        }
    }

    pub fn block_height(&self) -> BlockHeight {
        match self {
            Self::FlashMint { block_height, .. }
            | Self::ReceiverApproved { block_height, .. }
            | Self::ReceiverRemoved { block_height, .. }
            | Self::FeeUpdated { block_height, .. }
            | Self::MaxSingleLoanUpdated { block_height, .. }
            | Self::MaxBlockVolumeUpdated { block_height, .. }
            | Self::ProtocolPaused { block_height, .. }
            | Self::ProtocolUnpaused { block_height, .. }
            | Self::AdminChanged { block_height, .. } => *block_height,
        }
    }

    /// Serialize event to bytes for storage/transmission
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}

/// Append-only record of emitted events
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<FlashStackEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: FlashStackEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[FlashStackEvent] {
        &self.events
    }

    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&FlashStackEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn last(&self) -> Option<&FlashStackEvent> {
        self.events.last()
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
