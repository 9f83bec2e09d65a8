//! Claim and release of blocks owned by the shared motion queue.

/// A planned block of the shared motion queue.
///
/// The queue cannot retire a block while it is taken. Each `take` must be matched by
/// exactly one `release`.
pub trait BlockHandle {
    /// Hold the block so the queue waits for this axis.
    fn take(&self);

    /// Give the block back.
    fn release(&self);

    /// Step events of the primary axes over the whole block.
    fn steps_event_count(&self) -> u32;

    /// Primary-axis length of the block.
    fn millimeters(&self) -> f32;
}

impl<B: BlockHandle + ?Sized> BlockHandle for &B {
    fn take(&self) {
        (**self).take()
    }

    fn release(&self) {
        (**self).release()
    }

    fn steps_event_count(&self) -> u32 {
        (**self).steps_event_count()
    }

    fn millimeters(&self) -> f32 {
        (**self).millimeters()
    }
}

/// At most one block held by an axis.
#[derive(Debug)]
pub struct ClaimedBlock<B: BlockHandle> {
    block: Option<B>,
}

impl<B: BlockHandle> Default for ClaimedBlock<B> {
    fn default() -> Self {
        Self { block: None }
    }
}

impl<B: BlockHandle> ClaimedBlock<B> {
    /// Create an empty claim.
    pub const fn new() -> Self {
        Self { block: None }
    }

    /// Take `block` and hold it. A block still held is released first.
    pub fn claim(&mut self, block: B) {
        self.release();
        block.take();
        self.block = Some(block);
    }

    /// Release the held block, if any.
    ///
    /// Returns whether a block was released.
    pub fn release(&mut self) -> bool {
        match self.block.take() {
            Some(block) => {
                block.release();
                true
            }
            None => false,
        }
    }

    /// Forget the held block without releasing it.
    ///
    /// Used at block end, where the release is left to the stepper completion.
    pub fn clear(&mut self) {
        self.block = None;
    }

    /// The held block.
    pub fn get(&self) -> Option<&B> {
        self.block.as_ref()
    }

    /// Whether a block is held.
    pub fn is_claimed(&self) -> bool {
        self.block.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[derive(Default)]
    struct CountingBlock {
        taken: Cell<u32>,
        released: Cell<u32>,
    }

    impl BlockHandle for CountingBlock {
        fn take(&self) {
            self.taken.set(self.taken.get() + 1);
        }

        fn release(&self) {
            self.released.set(self.released.get() + 1);
        }

        fn steps_event_count(&self) -> u32 {
            400
        }

        fn millimeters(&self) -> f32 {
            20.0
        }
    }

    #[test]
    fn test_claim_then_release() {
        let block = CountingBlock::default();
        let mut claim = ClaimedBlock::new();

        claim.claim(&block);
        assert!(claim.is_claimed());
        assert_eq!(block.taken.get(), 1);

        assert!(claim.release());
        assert!(!claim.is_claimed());
        assert_eq!(block.released.get(), 1);
    }

    #[test]
    fn test_release_when_empty_is_noop() {
        let mut claim: ClaimedBlock<&CountingBlock> = ClaimedBlock::new();
        assert!(!claim.release());
    }

    #[test]
    fn test_clear_does_not_release() {
        let block = CountingBlock::default();
        let mut claim = ClaimedBlock::new();

        claim.claim(&block);
        claim.clear();

        assert!(!claim.is_claimed());
        assert_eq!(block.released.get(), 0);
        assert!(!claim.release());
    }

    #[test]
    fn test_reclaim_releases_previous() {
        let first = CountingBlock::default();
        let second = CountingBlock::default();
        let mut claim = ClaimedBlock::new();

        claim.claim(&first);
        claim.claim(&second);

        assert_eq!(first.released.get(), 1);
        assert_eq!(second.taken.get(), 1);
        assert_eq!(claim.get().map(|b| b.millimeters()), Some(20.0));
    }
}
