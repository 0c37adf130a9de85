//! Saved containers and their byte streams.
//!
//! | Container | Stream |
//! |-----------|--------|
//! | [`ObjectData`] | `[field bytes]` |
//! | [`ActorData`] | `[field bytes][pose]` |
//! | [`ActorProxy`] | `[class: string][name: string][pose][data: u32 len + bytes]` |
//!
//! Strings are `u32` length + UTF-8. The pose is the 40-byte layout of
//! [`Transform::to_pose_bytes`]. Streams carry no version or magic number.

use keepsake_core::Transform;
use keepsake_core::transform::POSE_SIZE;

use crate::buffer::ByteBuffer;
use crate::error::{PersistError, PersistResult};

/// A container with a byte stream of its own, for storage on disk.
pub trait Container: Sized {
    /// Name used in logs.
    const KIND: &'static str;

    fn to_bytes(&self) -> PersistResult<Vec<u8>>;

    fn from_bytes(bytes: &[u8]) -> PersistResult<Self>;
}

/// One object's field state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectData {
    pub data: ByteBuffer,
}

impl ObjectData {
    pub fn new(data: ByteBuffer) -> Self {
        Self { data }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Container for ObjectData {
    const KIND: &'static str = "object data";

    fn to_bytes(&self) -> PersistResult<Vec<u8>> {
        Ok(self.data.as_slice().to_vec())
    }

    fn from_bytes(bytes: &[u8]) -> PersistResult<Self> {
        Ok(Self::new(ByteBuffer::from(bytes)))
    }
}

/// Field state plus placement, for re-applying to an actor that exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActorData {
    pub data: ByteBuffer,
    pub transform: Transform,
}

impl Container for ActorData {
    const KIND: &'static str = "actor data";

    fn to_bytes(&self) -> PersistResult<Vec<u8>> {
        let mut out = Vec::with_capacity(self.data.len() + POSE_SIZE);
        out.extend_from_slice(self.data.as_slice());
        out.extend_from_slice(&self.transform.to_pose_bytes());
        Ok(out)
    }

    /// The pose is the trailing 40 bytes; everything before it is field data.
    fn from_bytes(bytes: &[u8]) -> PersistResult<Self> {
        let split = bytes
            .len()
            .checked_sub(POSE_SIZE)
            .ok_or_else(|| PersistError::Underrun {
                what: "actor data pose".into(),
                needed: POSE_SIZE,
                remaining: bytes.len(),
            })?;
        let (data, pose) = bytes.split_at(split);
        let pose: &[u8; POSE_SIZE] = pose.try_into().map_err(|_| PersistError::Corrupt {
            what: "actor data pose".into(),
            reason: format!("expected {POSE_SIZE} bytes"),
        })?;
        Ok(Self {
            data: ByteBuffer::from(data),
            transform: Transform::from_pose_bytes(pose),
        })
    }
}

/// Everything needed to spawn an actor from nothing and restore it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActorProxy {
    /// Fully qualified type path of the actor class.
    pub actor_class: String,
    pub actor_name: String,
    pub actor_transform: Transform,
    pub actor_data: ByteBuffer,
}

impl ActorProxy {
    /// Fails with `InvalidProxy` unless both the class path and the field
    /// data are present.
    pub fn validate(&self) -> PersistResult<()> {
        if self.actor_class.is_empty() {
            return Err(PersistError::InvalidProxy {
                reason: format!("actor '{}' has no class path", self.actor_name),
            });
        }
        if self.actor_data.is_empty() {
            return Err(PersistError::InvalidProxy {
                reason: format!(
                    "actor '{}' of class '{}' has no field data",
                    self.actor_name, self.actor_class
                ),
            });
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl Container for ActorProxy {
    const KIND: &'static str = "actor proxy";

    fn to_bytes(&self) -> PersistResult<Vec<u8>> {
        let mut out = ByteBuffer::with_capacity(
            12 + self.actor_class.len() + self.actor_name.len() + POSE_SIZE + self.actor_data.len(),
        );
        out.write_string(&self.actor_class, "actor class")?;
        out.write_string(&self.actor_name, "actor name")?;
        out.append(&self.actor_transform.to_pose_bytes());
        out.write_block(self.actor_data.as_slice(), "actor data")?;
        Ok(out.into_vec())
    }

    fn from_bytes(bytes: &[u8]) -> PersistResult<Self> {
        let mut input = ByteBuffer::from(bytes);
        let actor_class = input.read_string("actor class")?;
        let actor_name = input.read_string("actor name")?;
        let pose = input
            .read_array::<POSE_SIZE>()
            .map_err(|e| e.in_field("actor transform"))?;
        let actor_data = input.read_block("actor data")?;

        if input.remaining() > 0 {
            log::warn!(
                "Actor proxy '{actor_name}' has {} trailing bytes",
                input.remaining()
            );
        }

        Ok(Self {
            actor_class,
            actor_name,
            actor_transform: Transform::from_pose_bytes(&pose),
            actor_data: ByteBuffer::from_vec(actor_data),
        })
    }
}
