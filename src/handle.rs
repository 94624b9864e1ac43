//! Addressable, owned handles to source videos and encoded thumbnails.
//!
//! A [`HandleStore`] plays the role a host's object-URL table would: every
//! handle registered with it gets an address (`mem://image/7`) that can be
//! resolved back to its payload for as long as the handle is alive.
//!
//! Handles are move-only. [`ImageHandle::release`] and
//! [`SourceHandle::release`] consume the handle, and dropping an unreleased
//! handle releases it, so each registration is removed exactly once on
//! every exit path.
//!
//! # Example
//!
//! ```
//! use reelthumb::HandleStore;
//!
//! let store = HandleStore::new();
//! let image = store.register_image(vec![0xFF, 0xD8, 0xFF, 0xD9], 2, 2);
//! let address = image.address();
//! assert!(store.resolve(&address).is_some());
//!
//! image.release();
//! assert!(store.resolve(&address).is_none());
//! assert_eq!(store.outstanding(), 0);
//! ```

use std::{
    collections::HashMap,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use crate::error::ThumbnailError;

const ADDRESS_SCHEME: &str = "mem://";

/// Which kind of resource a handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// The original video.
    Source,
    /// An encoded still image.
    Image,
}

impl HandleKind {
    fn as_str(self) -> &'static str {
        match self {
            HandleKind::Source => "source",
            HandleKind::Image => "image",
        }
    }
}

/// The printable address of a live handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandleAddress {
    kind: HandleKind,
    id: u64,
}

impl HandleAddress {
    /// What the address points at.
    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    /// Parse an address previously produced by [`Display`].
    pub fn parse(value: &str) -> Option<Self> {
        let rest = value.strip_prefix(ADDRESS_SCHEME)?;
        let (kind, id) = rest.split_once('/')?;
        let kind = match kind {
            "source" => HandleKind::Source,
            "image" => HandleKind::Image,
            _ => return None,
        };
        Some(Self {
            kind,
            id: id.parse().ok()?,
        })
    }
}

impl Display for HandleAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{ADDRESS_SCHEME}{}/{}", self.kind.as_str(), self.id)
    }
}

/// What a resolved address yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePayload {
    /// Encoded image bytes.
    Bytes(Arc<[u8]>),
    /// Location of the source video bytes.
    File(PathBuf),
}

#[derive(Default)]
struct StoreInner {
    next_id: u64,
    entries: HashMap<(HandleKind, u64), HandlePayload>,
}

/// Registry of live handles.
///
/// Cloning a store is cheap and every clone refers to the same table.
#[derive(Clone, Default)]
pub struct HandleStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl Debug for HandleStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("HandleStore")
            .field("outstanding", &self.outstanding())
            .finish()
    }
}

impl HandleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        // A panic while holding the lock cannot leave the table half-written,
        // so a poisoned lock is still usable.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn insert(&self, kind: HandleKind, payload: HandlePayload) -> u64 {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.entries.insert((kind, id), payload);
        log::trace!("Registered {}{}/{}", ADDRESS_SCHEME, kind.as_str(), id);
        id
    }

    fn remove(&self, kind: HandleKind, id: u64) -> bool {
        let removed = self.lock().entries.remove(&(kind, id)).is_some();
        if removed {
            log::trace!("Released {}{}/{}", ADDRESS_SCHEME, kind.as_str(), id);
        }
        removed
    }

    /// Register encoded image bytes and return the owning handle.
    pub fn register_image(&self, bytes: Vec<u8>, width: u32, height: u32) -> ImageHandle {
        let bytes: Arc<[u8]> = bytes.into();
        let id = self.insert(HandleKind::Image, HandlePayload::Bytes(Arc::clone(&bytes)));
        ImageHandle {
            store: self.clone(),
            id,
            bytes,
            width,
            height,
            released: false,
        }
    }

    /// Register the location of a source video and return the owning handle.
    pub fn register_source<P: Into<PathBuf>>(&self, path: P) -> SourceHandle {
        let path = path.into();
        let id = self.insert(HandleKind::Source, HandlePayload::File(path.clone()));
        SourceHandle {
            store: self.clone(),
            id,
            path,
            released: false,
        }
    }

    /// Look up a live address.
    pub fn resolve(&self, address: &HandleAddress) -> Option<HandlePayload> {
        self.lock()
            .entries
            .get(&(address.kind, address.id))
            .cloned()
    }

    /// Number of handles registered and not yet released.
    pub fn outstanding(&self) -> usize {
        self.lock().entries.len()
    }
}

/// Owned handle to an encoded thumbnail.
pub struct ImageHandle {
    store: HandleStore,
    id: u64,
    bytes: Arc<[u8]>,
    width: u32,
    height: u32,
    released: bool,
}

impl Debug for ImageHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ImageHandle")
            .field("address", &self.address().to_string())
            .field("len", &self.bytes.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl ImageHandle {
    /// The address this handle is registered under.
    pub fn address(&self) -> HandleAddress {
        HandleAddress {
            kind: HandleKind::Image,
            id: self.id,
        }
    }

    /// The encoded image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Pixel width of the encoded image.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height of the encoded image.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Write the encoded bytes to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbnailError::IoError`] if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ThumbnailError> {
        fs::write(path, &self.bytes)?;
        Ok(())
    }

    /// Release the handle. Its address stops resolving.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if !self.released {
            self.released = true;
            self.store.remove(HandleKind::Image, self.id);
        }
    }
}

impl Drop for ImageHandle {
    fn drop(&mut self) {
        self.release_inner();
    }
}

/// Owned handle to the source video, kept for optional preview playback.
pub struct SourceHandle {
    store: HandleStore,
    id: u64,
    path: PathBuf,
    released: bool,
}

impl Debug for SourceHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SourceHandle")
            .field("address", &self.address().to_string())
            .field("path", &self.path)
            .finish()
    }
}

impl SourceHandle {
    /// The address this handle is registered under.
    pub fn address(&self) -> HandleAddress {
        HandleAddress {
            kind: HandleKind::Source,
            id: self.id,
        }
    }

    /// Location of the video bytes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the handle. Its address stops resolving.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if !self.released {
            self.released = true;
            self.store.remove(HandleKind::Source, self.id);
        }
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        self.release_inner();
    }
}
