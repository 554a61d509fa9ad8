//! Disposition key and content digest
//!
//! A file is correlated across observations by the flow endpoints that
//! carried it plus the upstream file signature.

use crate::error::{FileVerdictError, FileVerdictResult};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Width of the content digest (SHA-256)
pub const DIGEST_LEN: usize = 32;

/// Composite identity of a tracked file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DispositionKey {
    client: IpAddr,
    server: IpAddr,
    file_sig: u32,
}

impl DispositionKey {
    /// Create key from flow endpoints
    ///
    /// Both endpoints must share an address family and neither may be the
    /// unspecified address.
    pub fn new(client: IpAddr, server: IpAddr, file_sig: u32) -> FileVerdictResult<Self> {
        if client.is_ipv4() != server.is_ipv4() {
            return Err(FileVerdictError::MalformedKey(format!(
                "mixed address families: {} / {}",
                client, server
            )));
        }
        if client.is_unspecified() || server.is_unspecified() {
            return Err(FileVerdictError::MalformedKey(
                "unspecified endpoint address".into(),
            ));
        }

        Ok(Self {
            client,
            server,
            file_sig,
        })
    }

    /// Create key from raw header address bytes (4 or 16 octets each)
    pub fn from_octets(client: &[u8], server: &[u8], file_sig: u32) -> FileVerdictResult<Self> {
        Self::new(addr_from_octets(client)?, addr_from_octets(server)?, file_sig)
    }

    /// Client endpoint
    #[inline(always)]
    pub fn client(&self) -> IpAddr {
        self.client
    }

    /// Server endpoint
    #[inline(always)]
    pub fn server(&self) -> IpAddr {
        self.server
    }

    /// Upstream file signature
    #[inline(always)]
    pub fn file_sig(&self) -> u32 {
        self.file_sig
    }
}

impl fmt::Display for DispositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} sig={:#010x}", self.client, self.server, self.file_sig)
    }
}

fn addr_from_octets(raw: &[u8]) -> FileVerdictResult<IpAddr> {
    match raw.len() {
        4 => {
            let octets: [u8; 4] = raw
                .try_into()
                .map_err(|_| FileVerdictError::MalformedKey("bad IPv4 address".into()))?;
            Ok(IpAddr::V4(Ipv4Addr::from(octets)))
        }
        16 => {
            let octets: [u8; 16] = raw
                .try_into()
                .map_err(|_| FileVerdictError::MalformedKey("bad IPv6 address".into()))?;
            Ok(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        n => Err(FileVerdictError::MalformedKey(format!(
            "address must be 4 or 16 bytes, got {}",
            n
        ))),
    }
}

/// Fixed-width content digest produced by the signature subsystem
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct FileDigest([u8; DIGEST_LEN]);

impl FileDigest {
    /// All-zero digest (no signature recorded)
    pub const EMPTY: Self = Self([0u8; DIGEST_LEN]);

    /// Wrap raw digest bytes
    pub const fn new(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Build from a slice; `None` unless exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; DIGEST_LEN] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    /// True if no signature has been supplied
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Raw bytes
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl fmt::Debug for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileDigest({})", hex::encode(self.0))
    }
}

impl fmt::Display for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
