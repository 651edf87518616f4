// Typed access to memory that someone else is also reading.
// On the board that someone is the VGA controller scanning the on-chip
// buffer; in the simulator it is the window presenter. Either way every
// store goes straight to memory: no caching, no deferred writes, no fences.

use std::marker::PhantomData;
use std::ptr::NonNull;

/// Bounds-checked volatile byte view over a mapped (or borrowed) region.
pub struct MappedView<'a> {
    base: NonNull<u8>,
    len: usize,
    _region: PhantomData<&'a mut [u8]>,
}

impl<'a> MappedView<'a> {
    /// View over ordinary memory, used by the simulator and tests.
    pub fn from_slice(bytes: &'a mut [u8]) -> Self {
        let len = bytes.len();
        Self {
            base: NonNull::from(bytes).cast(),
            len,
            _region: PhantomData,
        }
    }

    /// # Safety
    /// `base` must point to `len` bytes that stay mapped and writable for `'a`,
    /// and no other Rust reference may alias them during that time.
    pub unsafe fn from_raw(base: NonNull<u8>, len: usize) -> Self {
        Self {
            base,
            len,
            _region: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn read(&self, offset: usize) -> Option<u8> {
        if offset >= self.len {
            return None;
        }
        // SAFETY: offset checked against the region length above.
        Some(unsafe { self.base.as_ptr().add(offset).read_volatile() })
    }

    /// Store one byte. Returns false (and writes nothing) past the end.
    #[inline]
    pub fn write(&mut self, offset: usize, value: u8) -> bool {
        if offset >= self.len {
            return false;
        }
        // SAFETY: offset checked against the region length above.
        unsafe { self.base.as_ptr().add(offset).write_volatile(value) };
        true
    }
}

/// A single byte-wide hardware register inside a mapped window.
pub struct Register<'a> {
    view: MappedView<'a>,
    offset: usize,
}

impl<'a> Register<'a> {
    pub fn new(view: MappedView<'a>, offset: usize) -> Self {
        if offset >= view.len() {
            log::warn!("register offset {offset:#x} lies outside a {:#x}-byte window", view.len());
        }
        Self { view, offset }
    }

    /// Fresh volatile read every call; out-of-window registers read as 0.
    pub fn read(&self) -> u8 {
        self.view.read(self.offset).unwrap_or(0)
    }
}

#[cfg(unix)]
pub use self::unix::DevMem;

#[cfg(unix)]
mod unix {
    use std::fs::{File, OpenOptions};
    use std::io;
    use std::os::fd::AsRawFd;
    use std::os::unix::fs::OpenOptionsExt;
    use std::path::Path;
    use std::ptr::NonNull;

    use super::MappedView;
    use crate::error::Error;

    /// Open handle on the physical memory device.
    pub struct DevMem {
        file: File,
    }

    impl DevMem {
        pub fn open(path: &Path) -> Result<Self, Error> {
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .custom_flags(libc::O_SYNC)
                .open(path)
                .map_err(|source| Error::DeviceOpen {
                    path: path.to_path_buf(),
                    source,
                })?;
            Ok(Self { file })
        }

        /// Map `span` bytes of physical memory starting at `base`, shared and read/write.
        pub fn map(&self, base: usize, span: usize) -> Result<Mapping, Error> {
            let fail = |source: io::Error| Error::Map { base, span, source };

            let addr = raw_mmap(self.file.as_raw_fd(), base, span).map_err(fail)?;
            let base_ptr = NonNull::new(addr.cast::<u8>())
                .ok_or_else(|| fail(io::Error::from(io::ErrorKind::AddrNotAvailable)))?;

            log::debug!("mapped {span:#x} bytes of physical {base:#x} at {addr:p}");
            Ok(Mapping { base: base_ptr, span })
        }
    }

    // The bridge windows sit above 2 GiB, which does not fit a 32-bit off_t.
    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    fn raw_mmap(fd: libc::c_int, base: usize, span: usize) -> io::Result<*mut libc::c_void> {
        let offset = libc::off64_t::try_from(base)
            .map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?;
        // SAFETY: fresh mapping chosen by the kernel; fd is open for the duration of the call.
        let addr = unsafe {
            libc::mmap64(
                std::ptr::null_mut(),
                span,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                fd,
                offset,
            )
        };
        if addr == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }
        Ok(addr)
    }

    #[cfg(not(all(target_os = "linux", target_env = "gnu")))]
    fn raw_mmap(fd: libc::c_int, base: usize, span: usize) -> io::Result<*mut libc::c_void> {
        let offset = libc::off_t::try_from(base)
            .map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?;
        // SAFETY: as above.
        let addr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                span,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                fd,
                offset,
            )
        };
        if addr == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }
        Ok(addr)
    }

    /// A live mmap region. Unmapped on drop.
    pub struct Mapping {
        base: NonNull<u8>,
        span: usize,
    }

    impl Mapping {
        pub fn view(&mut self) -> MappedView<'_> {
            // SAFETY: the mapping is `span` bytes long, lives as long as `self`,
            // and the &mut borrow keeps other views from aliasing it.
            unsafe { MappedView::from_raw(self.base, self.span) }
        }
    }

    impl Drop for Mapping {
        fn drop(&mut self) {
            // SAFETY: base/span came from a successful mmap.
            let rc = unsafe { libc::munmap(self.base.as_ptr().cast(), self.span) };
            if rc != 0 {
                log::warn!("munmap failed: {}", io::Error::last_os_error());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write_in_range() {
        let mut bytes = vec![0u8; 16];
        let mut view = MappedView::from_slice(&mut bytes);
        assert_eq!(view.len(), 16);
        assert!(view.write(3, 0xAB));
        assert_eq!(view.read(3), Some(0xAB));
        assert_eq!(view.read(15), Some(0));
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut bytes = vec![7u8; 4];
        {
            let mut view = MappedView::from_slice(&mut bytes);
            assert!(!view.write(4, 0));
            assert!(!view.write(usize::MAX, 0));
            assert_eq!(view.read(4), None);
        }
        assert_eq!(bytes, vec![7u8; 4]);
    }

    #[test]
    fn test_register_reads_live_value() {
        let mut bytes = vec![0u8; 0x50];
        bytes[0x40] = 2;
        let reg = Register::new(MappedView::from_slice(&mut bytes), 0x40);
        assert_eq!(reg.read(), 2);

        let mut short = vec![9u8; 4];
        let reg = Register::new(MappedView::from_slice(&mut short), 0x40);
        assert_eq!(reg.read(), 0);
    }
}
