//! miIO datagram framing.
//!
//! Every datagram starts with a 32-byte header, all integers big-endian:
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 2 | magic `0x2131` |
//! | 2 | 2 | datagram length, header included |
//! | 4 | 4 | `0`, all ones in the hello |
//! | 8 | 4 | device id |
//! | 12 | 4 | stamp |
//! | 16 | 16 | checksum |
//!
//! The JSON payload follows, encrypted with AES-128-CBC and PKCS#7 padding.
//! Key and IV derive from the 16-byte device token: `key = md5(token)`,
//! `iv = md5(key ‖ token)`. The checksum is `md5(header[..16] ‖ token ‖
//! encrypted payload)`.

use std::fmt;

use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use md5::digest::Output;
use md5::{Digest, Md5};

use crate::error::MiioError;

type Encryptor = cbc::Encryptor<aes::Aes128>;
type Decryptor = cbc::Decryptor<aes::Aes128>;

/// Size of the datagram header.
pub const HEADER_LEN: usize = 32;

const MAGIC: [u8; 2] = [0x21, 0x31];

/// Handshake datagram: magic, length 32, then 28 bytes of 0xff.
pub const HELLO: [u8; HEADER_LEN] = {
    let mut packet = [0xff_u8; HEADER_LEN];
    packet[0] = MAGIC[0];
    packet[1] = MAGIC[1];
    packet[2] = 0x00;
    packet[3] = 0x20;
    packet
};

/// The 16-byte secret shared with a device.
#[derive(Clone, PartialEq, Eq)]
pub struct Token([u8; 16]);

impl Token {
    /// Parse the 32 hex digit form shown by the vendor app.
    ///
    /// # Errors
    ///
    /// Returns [`MiioError::InvalidToken`] for anything else.
    pub fn from_hex(token: &str) -> Result<Self, MiioError> {
        let mut bytes = [0_u8; 16];
        hex::decode_to_slice(token.trim(), &mut bytes).map_err(|_| MiioError::InvalidToken)?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(..)")
    }
}

/// Device identity taken from a handshake reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handshake {
    pub device_id: u32,
    /// Device clock, in seconds, when the reply was sent.
    pub stamp: u32,
}

impl Handshake {
    /// Read the device id and stamp out of a handshake reply.
    ///
    /// # Errors
    ///
    /// Returns [`MiioError::UnexpectedResponse`] when the datagram is not a
    /// bare miIO header.
    pub fn parse(datagram: &[u8]) -> Result<Self, MiioError> {
        check_header(datagram)?;
        if datagram.len() != HEADER_LEN {
            return Err(MiioError::UnexpectedResponse(
                "handshake reply carries a payload".to_string(),
            ));
        }
        Ok(Self {
            device_id: be_u32(datagram, 8),
            stamp: be_u32(datagram, 12),
        })
    }
}

/// Seals outgoing payloads and opens incoming ones for one device token.
pub struct Codec {
    token: Token,
    key: Output<Md5>,
    iv: Output<Md5>,
}

impl Codec {
    #[must_use]
    pub fn new(token: Token) -> Self {
        let key = Md5::digest(token.0);
        let iv = Md5::new().chain_update(key).chain_update(token.0).finalize();
        Self { token, key, iv }
    }

    /// Encrypt `payload` and frame it for device `device_id` at `stamp`.
    ///
    /// # Errors
    ///
    /// Returns [`MiioError::PayloadTooLarge`] when the datagram length does
    /// not fit the 16-bit length field.
    pub fn seal(
        &self,
        device_id: u32,
        stamp: u32,
        payload: &[u8],
    ) -> Result<Vec<u8>, MiioError> {
        let encrypted = Encryptor::new(&self.key, &self.iv).encrypt_padded_vec_mut::<Pkcs7>(payload);
        let len = u16::try_from(HEADER_LEN + encrypted.len())
            .map_err(|_| MiioError::PayloadTooLarge(payload.len()))?;

        let mut datagram = Vec::with_capacity(usize::from(len));
        datagram.extend_from_slice(&MAGIC);
        datagram.extend_from_slice(&len.to_be_bytes());
        datagram.extend_from_slice(&0_u32.to_be_bytes());
        datagram.extend_from_slice(&device_id.to_be_bytes());
        datagram.extend_from_slice(&stamp.to_be_bytes());
        let checksum = self.checksum(&datagram, &encrypted);
        datagram.extend_from_slice(&checksum);
        datagram.extend_from_slice(&encrypted);
        Ok(datagram)
    }

    /// Verify and decrypt a datagram, returning its payload.
    ///
    /// Trailing NUL bytes, which some firmwares append, are stripped.
    ///
    /// # Errors
    ///
    /// Returns [`MiioError::UnexpectedResponse`] for a malformed header,
    /// [`MiioError::ChecksumMismatch`] when the datagram was not sealed with
    /// this token and [`MiioError::Decrypt`] when the payload does not
    /// decrypt.
    pub fn open(&self, datagram: &[u8]) -> Result<Vec<u8>, MiioError> {
        check_header(datagram)?;
        let (header, encrypted) = datagram.split_at(HEADER_LEN);
        if self.checksum(&header[..16], encrypted)[..] != header[16..] {
            return Err(MiioError::ChecksumMismatch);
        }
        let mut payload = Decryptor::new(&self.key, &self.iv)
            .decrypt_padded_vec_mut::<Pkcs7>(encrypted)
            .map_err(|_| MiioError::Decrypt)?;
        while payload.last() == Some(&0) {
            payload.pop();
        }
        Ok(payload)
    }

    fn checksum(&self, header: &[u8], encrypted: &[u8]) -> Output<Md5> {
        Md5::new()
            .chain_update(header)
            .chain_update(self.token.0)
            .chain_update(encrypted)
            .finalize()
    }
}

fn check_header(datagram: &[u8]) -> Result<(), MiioError> {
    if datagram.len() < HEADER_LEN || datagram[..2] != MAGIC {
        return Err(MiioError::UnexpectedResponse(format!(
            "{} byte datagram is not a miIO packet",
            datagram.len()
        )));
    }
    let declared = usize::from(u16::from_be_bytes([datagram[2], datagram[3]]));
    if declared != datagram.len() {
        return Err(MiioError::UnexpectedResponse(format!(
            "header declares {declared} bytes, datagram has {}",
            datagram.len()
        )));
    }
    Ok(())
}

fn be_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}
