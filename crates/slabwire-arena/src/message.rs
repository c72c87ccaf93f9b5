//! Message handles.
//!
//! A [`Message`] owns one block of its [`Arena`] for as long as it lives.
//! It accumulates bytes with [`Message::append`], moving itself to a larger
//! block when it runs out of room, and gives its block back when released
//! or dropped.

use std::any::Any;
use std::fmt;
use std::io;
use std::ops::Deref;
use std::sync::MutexGuard;

use slabwire_core::{SizeClass, SocketId};

use crate::arena::Arena;
use crate::error::ArenaError;
use crate::handle::BlockHandle;

/// A growable byte sequence stored in an arena block.
///
/// Exactly one `Message` exists per held block. Messages are not `Clone`,
/// and releasing consumes the handle, so a block can be neither aliased nor
/// freed twice. A message borrows its arena and cannot outlive it.
///
/// Mutation requires `&mut self`: one flow fills a message at a time, while
/// other messages in the same arena may be filled concurrently on other
/// threads.
pub struct Message<'a> {
    arena: &'a Arena,
    pub(crate) block: BlockHandle,
    len: usize,
    socket_id: SocketId,
    metadata: Option<Box<dyn Any + Send>>,
}

impl<'a> Message<'a> {
    pub(crate) fn new(arena: &'a Arena, block: BlockHandle) -> Self {
        Self {
            arena,
            block,
            len: 0,
            socket_id: SocketId::default(),
            metadata: None,
        }
    }

    /// The arena that owns this message's block.
    pub fn arena(&self) -> &'a Arena {
        self.arena
    }

    /// Whether this message was issued by `arena`.
    pub fn belongs_to(&self, arena: &Arena) -> bool {
        self.arena.same_as(arena)
    }

    /// Socket the message was read from or is destined for.
    pub fn socket_id(&self) -> SocketId {
        self.socket_id
    }

    /// Tag the message with its socket.
    pub fn set_socket_id(&mut self, socket_id: SocketId) {
        self.socket_id = socket_id;
    }

    /// The block currently backing this message.
    pub fn block(&self) -> BlockHandle {
        self.block
    }

    /// Size class of the current block.
    pub fn class(&self) -> SizeClass {
        self.block.class
    }

    /// Byte offset of the current block within its class's region.
    pub fn offset(&self) -> u32 {
        self.arena.region(self.block.class).offset_of(self.block.index)
    }

    /// Capacity of the current block.
    pub fn capacity(&self) -> usize {
        self.arena.block_capacity(self.block.class)
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Free space left in the current block, before any promotion.
    pub fn remaining(&self) -> usize {
        self.capacity() - self.len
    }

    /// Append `source[offset..offset + length]`.
    ///
    /// If the bytes do not fit the current block, the message is promoted
    /// one class at a time until they do. Returns the number of bytes
    /// copied.
    ///
    /// On error nothing is copied and the length is unchanged:
    /// - [`ArenaError::MessageTooLarge`] if the total would exceed the
    ///   largest class; the message is not moved.
    /// - [`ArenaError::Exhausted`] if some class on the way up has no free
    ///   block; the message stays in its current block.
    /// - [`ArenaError::SourceOutOfBounds`] if the range is not within `source`.
    pub fn append(
        &mut self,
        source: &[u8],
        offset: usize,
        length: usize,
    ) -> Result<usize, ArenaError> {
        let end = offset
            .checked_add(length)
            .filter(|&end| end <= source.len())
            .ok_or(ArenaError::SourceOutOfBounds {
                offset,
                length,
                source_len: source.len(),
            })?;

        let needed = self.len + length;
        if needed > self.capacity() {
            let arena = self.arena;
            arena.promote_to_fit(self, needed)?;
        }

        let src = &source[offset..end];
        let copied = src.len().min(self.remaining());
        {
            let mut block = self.lock_block();
            block[self.len..self.len + copied].copy_from_slice(&src[..copied]);
        }
        self.len += copied;
        Ok(copied)
    }

    /// Append all of `source`.
    pub fn append_all(&mut self, source: &[u8]) -> Result<usize, ArenaError> {
        self.append(source, 0, source.len())
    }

    /// Move this message to a block of the next larger class.
    ///
    /// See [`Arena::promote`].
    pub fn promote(&mut self) -> Result<(), ArenaError> {
        let arena = self.arena;
        arena.promote(self)
    }

    /// Copy the bytes of `other` from `split_index` to its end into the
    /// start of this message.
    ///
    /// Used when a read buffer holds one complete message followed by the
    /// beginning of the next. `other` is not modified; truncate it to
    /// `split_index` with [`Message::truncate`] once the tail is safe.
    /// This message must be empty and is never promoted: a tail larger than
    /// its current capacity is rejected. Returns the tail length, which
    /// becomes this message's length.
    pub fn split_tail(&mut self, other: &Message<'_>, split_index: usize) -> Result<usize, ArenaError> {
        if self.len != 0 {
            return Err(ArenaError::SplitTargetNotEmpty { length: self.len });
        }
        if split_index > other.len {
            return Err(ArenaError::SplitOutOfBounds {
                split_index,
                length: other.len,
            });
        }
        let tail = other.len - split_index;
        let capacity = self.capacity();
        if tail > capacity {
            return Err(ArenaError::SplitTooLarge { tail, capacity });
        }

        {
            let src = other.lock_block();
            let mut dst = self.lock_block();
            dst[..tail].copy_from_slice(&src[split_index..other.len]);
        }
        self.len = tail;
        Ok(tail)
    }

    /// Shorten the message to `len` bytes. Has no effect if `len` is not
    /// less than the current length.
    pub fn truncate(&mut self, len: usize) {
        if len < self.len {
            self.len = len;
        }
    }

    /// Discard all bytes, keeping the current block.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Read-only view of the bytes written so far.
    ///
    /// The view holds this message's block lock until dropped, so it
    /// borrows the message exclusively: nothing else can lock the same
    /// block while the view is alive.
    ///
    /// ```compile_fail
    /// # use slabwire_arena::{Arena, ArenaConfig};
    /// let arena = Arena::new(ArenaConfig::default()).unwrap();
    /// let mut msg = arena.acquire().unwrap();
    /// let view = msg.bytes();
    /// let copy = msg.to_vec();
    /// assert_eq!(&*view, &copy[..]);
    /// ```
    ///
    /// ```compile_fail
    /// # use slabwire_arena::{Arena, ArenaConfig};
    /// let arena = Arena::new(ArenaConfig::default()).unwrap();
    /// let mut first = arena.acquire().unwrap();
    /// let mut second = arena.acquire().unwrap();
    /// let view = first.bytes();
    /// second.split_tail(&first, 0).unwrap();
    /// drop(view);
    /// ```
    pub fn bytes(&mut self) -> MessageBytes<'_> {
        MessageBytes {
            guard: self.lock_block(),
            len: self.len,
        }
    }

    /// Copy the bytes written so far into a new `Vec`.
    pub fn to_vec(&self) -> Vec<u8> {
        self.lock_block()[..self.len].to_vec()
    }

    /// The collaborator-owned metadata slot.
    pub fn metadata(&self) -> Option<&(dyn Any + Send)> {
        self.metadata.as_deref()
    }

    /// The metadata slot, if it holds a `T`.
    pub fn metadata_ref<T: Any>(&self) -> Option<&T> {
        self.metadata.as_deref()?.downcast_ref::<T>()
    }

    /// Store `value` in the metadata slot, replacing any previous value.
    pub fn set_metadata<T: Any + Send>(&mut self, value: T) {
        self.metadata = Some(Box::new(value));
    }

    /// Remove and return the metadata slot's contents.
    pub fn take_metadata(&mut self) -> Option<Box<dyn Any + Send>> {
        self.metadata.take()
    }

    /// Give the block back to the arena. The handle is consumed.
    pub fn release(self) {
        drop(self);
    }

    fn lock_block(&self) -> MutexGuard<'a, Box<[u8]>> {
        self.arena.region(self.block.class).lock(self.block.index)
    }
}

impl Drop for Message<'_> {
    fn drop(&mut self) {
        self.arena.release_block(self.block);
    }
}

impl fmt::Debug for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("socket_id", &self.socket_id)
            .field("block", &self.block)
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("has_metadata", &self.metadata.is_some())
            .finish()
    }
}

/// Streaming writes for code that already speaks `std::io`.
///
/// Exhaustion surfaces as [`io::ErrorKind::WouldBlock`] so socket-style
/// loops can back off; every other arena error is
/// [`io::ErrorKind::InvalidInput`].
impl io::Write for Message<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append_all(buf).map_err(|err| {
            let kind = if err.is_transient() {
                io::ErrorKind::WouldBlock
            } else {
                io::ErrorKind::InvalidInput
            };
            io::Error::new(kind, err)
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Read-only view of a message's bytes, holding its block lock.
pub struct MessageBytes<'m> {
    guard: MutexGuard<'m, Box<[u8]>>,
    len: usize,
}

impl Deref for MessageBytes<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.guard[..self.len]
    }
}

impl AsRef<[u8]> for MessageBytes<'_> {
    fn as_ref(&self) -> &[u8] {
        self
    }
}
