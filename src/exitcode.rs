//! Process exit codes, a subset of BSD `sysexits.h`

/// Record file is not a usable list of records, or a lookup found nothing
pub const DATAERR: i32 = 65;

/// Record file does not exist
pub const NOINPUT: i32 = 66;

/// Tree could not be serialized
pub const SOFTWARE: i32 = 70;

/// Reading a file failed
pub const IOERR: i32 = 74;

/// Settings could not be loaded
pub const CONFIG: i32 = 78;
