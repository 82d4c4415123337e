//! Narrow raw-handle lookups for informational keys.
//!
//! The safe binding surfaces only a handful of `SQLGetInfo` keys
//! (`database_management_system_name` among them). The remaining keys the
//! probe reports — `SQL_DBMS_VER`, `SQL_MAX_CONCURRENT_ACTIVITIES`, and
//! `SQL_GETDATA_EXTENSIONS` — are fetched here with direct `SQLGetInfo`
//! calls against the connection handle. This is the only module that needs
//! `unsafe`. A lookup that does not succeed yields `None`, which the
//! caller renders as the undefined sentinel.

#![allow(unsafe_code)]

use odbc_api::sys::{self, HDbc, InfoType, SqlReturn};

fn succeeded(ret: SqlReturn) -> bool {
    ret == SqlReturn::SUCCESS || ret == SqlReturn::SUCCESS_WITH_INFO
}

/// Fetches a 16-bit unsigned informational value.
pub(crate) fn info_u16(connection: HDbc, info_type: InfoType) -> Option<u16> {
    let mut value: u16 = 0;
    // SAFETY: `connection` is a live connection handle borrowed from the
    // session for the duration of the call; the out pointer is a valid
    // u16, and fixed-size values ignore the buffer length.
    let ret = unsafe {
        sys::SQLGetInfo(
            connection,
            info_type,
            std::ptr::from_mut(&mut value).cast(),
            0,
            std::ptr::null_mut(),
        )
    };
    succeeded(ret).then_some(value)
}

/// Fetches a 32-bit unsigned informational bitmask.
pub(crate) fn info_u32(connection: HDbc, info_type: InfoType) -> Option<u32> {
    let mut value: u32 = 0;
    // SAFETY: same contract as `info_u16`; the out pointer is a valid u32.
    let ret = unsafe {
        sys::SQLGetInfo(
            connection,
            info_type,
            std::ptr::from_mut(&mut value).cast(),
            0,
            std::ptr::null_mut(),
        )
    };
    succeeded(ret).then_some(value)
}

/// Fetches a character informational value.
pub(crate) fn info_string(connection: HDbc, info_type: InfoType) -> Option<String> {
    let mut buffer = [0u8; 256];
    let mut length: sys::SmallInt = 0;
    // SAFETY: the out buffer and length pointers stay valid for the call;
    // the driver writes at most `buffer.len()` bytes including the
    // terminating nul and reports the full length separately.
    let ret = unsafe {
        sys::SQLGetInfo(
            connection,
            info_type,
            buffer.as_mut_ptr().cast(),
            buffer.len() as sys::SmallInt,
            &mut length,
        )
    };
    if !succeeded(ret) {
        return None;
    }
    // `length` is the untruncated length, which can exceed the buffer.
    let reported = usize::try_from(length).unwrap_or(0).min(buffer.len() - 1);
    Some(String::from_utf8_lossy(&buffer[..reported]).into_owned())
}
