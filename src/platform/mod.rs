//! What the host operating system can do.

pub trait Platform {
    /// Whether world data can be mirrored to and from a RAM disk with `rsync`.
    fn is_supported_ram_disk_platform(&self) -> bool;
}

/// The platform this program was compiled for.
pub struct Host;

impl Platform for Host {
    fn is_supported_ram_disk_platform(&self) -> bool {
        return cfg!(target_os = "linux");
    }
}
