//! Channel identifier allocation.
//!
//! Identifiers mimic the block/transaction-index scheme of a real chain:
//! at most [`MAX_INDEX_PER_BLOCK`] channels share a block height before the
//! cursor rolls over to the next block.

use super::types::ChannelId;

/// First block height used for generated channels
pub const FIRST_BLOCK: u64 = 500;
/// Highest transaction index issued within a single block
pub const MAX_INDEX_PER_BLOCK: u32 = 200;

/// Monotonic channel id cursor, one per topology.
///
/// The allocator is owned by the topology it serves, so independent
/// topologies built in the same process never share ids.
#[derive(Debug, Clone)]
pub struct ChannelIdAllocator {
    next: ChannelId,
}

impl ChannelIdAllocator {
    pub fn new() -> Self {
        ChannelIdAllocator {
            next: ChannelId::new(FIRST_BLOCK, 1),
        }
    }

    /// Issue the next identifier and advance the cursor.
    ///
    /// Must be called exactly once per channel, in creation order.
    pub fn next_id(&mut self) -> ChannelId {
        let assigned = self.next;
        self.next.index += 1;
        if self.next.index > MAX_INDEX_PER_BLOCK {
            self.next.index = 1;
            self.next.block += 1;
        }
        assigned
    }

    /// The identifier the next call to [`next_id`](Self::next_id) will return
    pub fn peek(&self) -> ChannelId {
        self.next
    }
}

impl Default for ChannelIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
