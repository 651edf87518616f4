// Relative-motion pointer input.
//
// The mouse multiplexer speaks the PS/2 3-byte format:
// - Byte 0: buttons in bits 0..=2, bit 3 always set, sign/overflow above
// - Byte 1: X movement, two's complement
// - Byte 2: Y movement, two's complement, positive = up
//
// Buttons map as bit 0 = primary (left), bit 1 = secondary (right),
// bit 2 = tertiary (middle).
//
// A packet source never blocks: "nothing pending" is `None`, and so is
// anything short, torn or unreadable.

pub const PACKET_LEN: usize = 3;

pub type Packet = [u8; PACKET_LEN];

const BUTTON_PRIMARY: u8 = 0x01;
const BUTTON_SECONDARY: u8 = 0x02;
const BUTTON_TERTIARY: u8 = 0x04;
const ALWAYS_ONE: u8 = 0x08;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons {
    pub primary: bool,
    pub secondary: bool,
    pub tertiary: bool,
}

impl Buttons {
    pub fn from_status(status: u8) -> Self {
        Self {
            primary: status & BUTTON_PRIMARY != 0,
            secondary: status & BUTTON_SECONDARY != 0,
            tertiary: status & BUTTON_TERTIARY != 0,
        }
    }

    /// Inverse of `from_status`, with the always-one bit set.
    pub fn to_status(self) -> u8 {
        let mut status = ALWAYS_ONE;
        if self.primary {
            status |= BUTTON_PRIMARY;
        }
        if self.secondary {
            status |= BUTTON_SECONDARY;
        }
        if self.tertiary {
            status |= BUTTON_TERTIARY;
        }
        status
    }
}

/// One decoded packet, still in device convention (dy > 0 means up).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseEvent {
    pub dx: i32,
    pub dy: i32,
    pub buttons: Buttons,
}

impl MouseEvent {
    pub fn decode(packet: &Packet) -> Self {
        Self {
            dx: packet[1] as i8 as i32,
            dy: packet[2] as i8 as i32,
            buttons: Buttons::from_status(packet[0]),
        }
    }

    /// Build the wire packet for a motion, clamping deltas into a signed byte.
    pub fn encode(dx: i32, dy: i32, buttons: Buttons) -> Packet {
        let clamp = |d: i32| d.clamp(i8::MIN as i32 + 1, i8::MAX as i32) as i8 as u8;
        [buttons.to_status(), clamp(dx), clamp(dy)]
    }
}

/// Reassembles packets from a byte stream that may be split at any point.
/// Resynchronizes on the always-one bit of the status byte.
#[derive(Debug, Default)]
pub struct PacketAssembler {
    buffer: Packet,
    index: usize,
}

impl PacketAssembler {
    pub const fn new() -> Self {
        Self {
            buffer: [0; PACKET_LEN],
            index: 0,
        }
    }

    pub fn push(&mut self, byte: u8) -> Option<Packet> {
        if self.index == 0 && byte & ALWAYS_ONE == 0 {
            log::trace!("dropping out-of-sync byte {byte:#04x}");
            return None;
        }

        self.buffer[self.index] = byte;
        self.index += 1;

        if self.index == PACKET_LEN {
            self.index = 0;
            Some(self.buffer)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

/// Anything that can be polled for complete packets without blocking.
pub trait PacketSource {
    fn poll_packet(&mut self) -> Option<Packet>;
}

#[cfg(unix)]
pub use self::unix::MouseDevice;

#[cfg(unix)]
mod unix {
    use std::fs::{File, OpenOptions};
    use std::io::{self, ErrorKind, Read};
    use std::os::fd::AsRawFd;
    use std::path::Path;

    use super::{PACKET_LEN, Packet, PacketAssembler, PacketSource};
    use crate::error::Error;

    /// Non-blocking handle on the mouse multiplexer.
    pub struct MouseDevice {
        file: File,
        assembler: PacketAssembler,
    }

    impl MouseDevice {
        pub fn open(path: &Path) -> Result<Self, Error> {
            let file = OpenOptions::new()
                .read(true)
                .open(path)
                .map_err(|source| Error::DeviceOpen {
                    path: path.to_path_buf(),
                    source,
                })?;
            set_nonblocking(&file).map_err(|source| Error::NonBlocking {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(Self {
                file,
                assembler: PacketAssembler::new(),
            })
        }
    }

    fn set_nonblocking(file: &File) -> io::Result<()> {
        let fd = file.as_raw_fd();
        // SAFETY: fd is owned by `file` and open.
        let flags = unsafe { libc::fcntl(fd, libc::F_GETFL, 0) };
        if flags < 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: as above.
        if unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) } < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    impl PacketSource for MouseDevice {
        fn poll_packet(&mut self) -> Option<Packet> {
            let mut bytes = [0u8; PACKET_LEN];
            let n = match self.file.read(&mut bytes) {
                Ok(n) => n,
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                    return None;
                }
                Err(e) => {
                    log::debug!("mouse read failed: {e}");
                    self.assembler.reset();
                    return None;
                }
            };

            let mut packet = None;
            for &byte in &bytes[..n] {
                if let Some(p) = self.assembler.push(byte) {
                    packet = Some(p);
                }
            }
            packet
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_bits() {
        let b = Buttons::from_status(0x08 | 0x01);
        assert!(b.primary && !b.secondary && !b.tertiary);
        let b = Buttons::from_status(0x08 | 0x02);
        assert!(!b.primary && b.secondary && !b.tertiary);
        let b = Buttons::from_status(0x08 | 0x04);
        assert!(!b.primary && !b.secondary && b.tertiary);
        assert_eq!(Buttons::from_status(0x08), Buttons::default());
    }

    #[test]
    fn test_decode_signed_deltas() {
        let ev = MouseEvent::decode(&[0x09, 10, 3]);
        assert_eq!((ev.dx, ev.dy), (10, 3));
        assert!(ev.buttons.primary);

        // 0xCE = -50, 0xFF = -1
        let ev = MouseEvent::decode(&[0x08, 0xCE, 0xFF]);
        assert_eq!((ev.dx, ev.dy), (-50, -1));
    }

    #[test]
    fn test_short_read_is_no_event() {
        let mut asm = PacketAssembler::new();
        assert_eq!(asm.push(0x08), None);
        assert_eq!(asm.push(0x01), None);
        // The rest of the packet shows up on a later read.
        assert_eq!(asm.push(0x02), Some([0x08, 0x01, 0x02]));
    }

    #[test]
    fn test_encode_clamps_and_round_trips() {
        let buttons = Buttons { primary: false, secondary: true, tertiary: false };
        let packet = MouseEvent::encode(-300, 42, buttons);
        let ev = MouseEvent::decode(&packet);
        assert_eq!(ev.dx, -127);
        assert_eq!(ev.dy, 42);
        assert_eq!(ev.buttons, buttons);
        assert_ne!(packet[0] & 0x08, 0);
    }

    #[test]
    fn test_assembler_splits_and_resyncs() {
        let mut asm = PacketAssembler::new();
        // Leading garbage without the always-one bit is skipped.
        assert_eq!(asm.push(0x00), None);
        assert_eq!(asm.push(0x05), None);
        assert_eq!(asm.push(0x09), None);
        assert_eq!(asm.push(0x01), None);
        assert_eq!(asm.push(0xFF), Some([0x09, 0x01, 0xFF]));
        // Second packet arrives whole.
        assert_eq!(asm.push(0x08), None);
        assert_eq!(asm.push(0x00), None);
        assert_eq!(asm.push(0x00), Some([0x08, 0x00, 0x00]));
    }

    #[test]
    fn test_assembler_reset_drops_partial() {
        let mut asm = PacketAssembler::new();
        asm.push(0x08);
        asm.push(0x05);
        asm.reset();
        assert_eq!(asm.push(0x00), None);
        assert_eq!(asm.push(0x0A), None);
        assert_eq!(asm.push(0x01), None);
        assert_eq!(asm.push(0x02), Some([0x0A, 0x01, 0x02]));
    }
}
