//! Thread counts from the OS APIs on platforms without `/proc`.
//!
//! - macOS: `proc_pidinfo(PROC_PIDTASKINFO)`, field `pti_threadnum`
//! - Windows: a Toolhelp thread snapshot, counting entries owned by the PID

use std::io;

/// Reads the current thread count of `pid`.
#[cfg(target_os = "macos")]
pub fn read_thread_count(pid: u32) -> io::Result<u64> {
    use std::mem;

    let size = mem::size_of::<libc::proc_taskinfo>() as libc::c_int;
    // SAFETY: proc_taskinfo is plain data, all-zero is a valid value.
    let mut info: libc::proc_taskinfo = unsafe { mem::zeroed() };
    // SAFETY: the buffer is a writable proc_taskinfo of exactly `size` bytes.
    let written = unsafe {
        libc::proc_pidinfo(
            pid as libc::c_int,
            libc::PROC_PIDTASKINFO,
            0,
            &mut info as *mut _ as *mut libc::c_void,
            size,
        )
    };

    if written <= 0 {
        return Err(io::Error::last_os_error());
    }
    if written != size {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("short proc_taskinfo for pid {}: {} bytes", pid, written),
        ));
    }
    Ok(info.pti_threadnum.max(0) as u64)
}

/// Reads the current thread count of `pid`.
///
/// A live process always owns at least one thread, so an empty result means
/// the process is gone and is reported as `NotFound`.
#[cfg(windows)]
pub fn read_thread_count(pid: u32) -> io::Result<u64> {
    use std::mem;
    use windows_sys::Win32::Foundation::{CloseHandle, INVALID_HANDLE_VALUE};
    use windows_sys::Win32::System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, Thread32First, Thread32Next, TH32CS_SNAPTHREAD, THREADENTRY32,
    };

    // SAFETY: no pointers are passed; the handle is checked before use.
    let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPTHREAD, 0) };
    if snapshot == INVALID_HANDLE_VALUE {
        return Err(io::Error::last_os_error());
    }

    // SAFETY: THREADENTRY32 is plain data, all-zero is a valid value.
    let mut entry: THREADENTRY32 = unsafe { mem::zeroed() };
    entry.dwSize = mem::size_of::<THREADENTRY32>() as u32;

    let mut count = 0u64;
    // SAFETY: `snapshot` is a valid thread snapshot and `entry.dwSize` is set.
    let mut more = unsafe { Thread32First(snapshot, &mut entry) } != 0;
    while more {
        if entry.th32OwnerProcessID == pid {
            count += 1;
        }
        // SAFETY: as above.
        more = unsafe { Thread32Next(snapshot, &mut entry) } != 0;
    }
    // SAFETY: `snapshot` was returned by CreateToolhelp32Snapshot and is closed once.
    unsafe { CloseHandle(snapshot) };

    if count == 0 {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no threads owned by pid {}", pid),
        ));
    }
    Ok(count)
}
