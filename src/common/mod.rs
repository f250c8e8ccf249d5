mod sysfs;

pub use sysfs::SysFs;
