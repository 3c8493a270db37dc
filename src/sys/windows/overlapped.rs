//! Positional reads and writes through overlapped requests. Each call issues one request tagged
//! with its offset and blocks until that request completes.

use std::ptr;

use tracing::warn;
use windows_sys::Win32::Foundation::{
    CloseHandle, ERROR_BROKEN_PIPE, ERROR_HANDLE_EOF, ERROR_IO_PENDING, FALSE, GetLastError, TRUE,
};
use windows_sys::Win32::Storage::FileSystem::{ReadFile, WriteFile};
use windows_sys::Win32::System::IO::{
    GetOverlappedResult, OVERLAPPED, OVERLAPPED_0, OVERLAPPED_0_0,
};
use windows_sys::Win32::System::Threading::CreateEventW;

use super::{Handle, clamp_len, last_error, seek};
use crate::error::PlatformErrorCode;
use crate::handle::SeekWhence;
use crate::sys::SysResult;

/// One in-flight request: its offset and the event signalled on completion. Never shared between
/// requests, and never moved while its request is pending.
struct OverlappedContext {
    overlapped: OVERLAPPED,
}

impl OverlappedContext {
    fn new(offset: u64) -> SysResult<OverlappedContext> {
        // SAFETY: An unnamed manual-reset event with default security.
        let event = unsafe { CreateEventW(ptr::null(), TRUE, FALSE, ptr::null()) };
        if event.is_null() {
            return Err(last_error());
        }

        Ok(OverlappedContext {
            overlapped: OVERLAPPED {
                Internal: 0,
                InternalHigh: 0,
                Anonymous: OVERLAPPED_0 {
                    Anonymous: OVERLAPPED_0_0 {
                        Offset: offset as u32,
                        OffsetHigh: (offset >> 32) as u32,
                    },
                },
                hEvent: event,
            },
        })
    }

    /// Checks that the request was issued. A request still pending is fine, completion is
    /// collected by [`wait`](OverlappedContext::wait) either way.
    fn issued(&self, ok: i32) -> SysResult<()> {
        if ok != 0 {
            return Ok(());
        }
        // SAFETY: Always safe to call.
        match unsafe { GetLastError() } {
            ERROR_IO_PENDING => Ok(()),
            code => Err(PlatformErrorCode::new(code)),
        }
    }

    /// Blocks until the request completes, returning the bytes transferred.
    fn wait(&self, handle: Handle) -> SysResult<usize> {
        let mut count = 0_u32;
        // SAFETY: self.overlapped belongs to a request issued on handle, and count is a valid out
        // pointer.
        match unsafe { GetOverlappedResult(handle.raw(), &self.overlapped, &mut count, TRUE) } {
            0 => Err(last_error()),
            _ => Ok(count as usize),
        }
    }
}

impl Drop for OverlappedContext {
    fn drop(&mut self) {
        // SAFETY: The event is owned by this context and its request has completed.
        if unsafe { CloseHandle(self.overlapped.hEvent) } == 0 {
            warn!(code = ?last_error(), "failed to close overlapped completion event");
        }
    }
}

/// Synchronous handles still take overlapped requests, but the request moves their file pointer.
fn preserving_position<T>(handle: Handle, io: impl FnOnce() -> SysResult<T>) -> SysResult<T> {
    if handle.overlapped {
        return io();
    }

    let saved = seek(handle, 0, SeekWhence::Current)?;
    let result = io();
    let restored = seek(handle, saved, SeekWhence::Beginning);
    let value = result?;
    restored?;
    Ok(value)
}

/// Reading at or past the end, or from a pipe whose writer is gone, reads nothing.
fn end_of_file(result: SysResult<usize>) -> SysResult<usize> {
    match result {
        Err(Some(code)) if matches!(code.raw(), ERROR_HANDLE_EOF | ERROR_BROKEN_PIPE) => Ok(0),
        result => result,
    }
}

pub fn read_at(handle: Handle, buf: &mut [u8], offset: u64) -> SysResult<usize> {
    preserving_position(handle, || {
        let mut context = OverlappedContext::new(offset)?;
        // SAFETY: buf and context both outlive the request, which is waited on below.
        let ok = unsafe {
            ReadFile(
                handle.raw(),
                buf.as_mut_ptr(),
                clamp_len(buf.len()),
                ptr::null_mut(),
                &mut context.overlapped,
            )
        };

        end_of_file(context.issued(ok).and_then(|()| context.wait(handle)))
    })
}

pub fn write_at(handle: Handle, buf: &[u8], offset: u64) -> SysResult<usize> {
    preserving_position(handle, || {
        let mut context = OverlappedContext::new(offset)?;
        // SAFETY: buf and context both outlive the request, which is waited on below.
        let ok = unsafe {
            WriteFile(
                handle.raw(),
                buf.as_ptr(),
                clamp_len(buf.len()),
                ptr::null_mut(),
                &mut context.overlapped,
            )
        };

        context.issued(ok)?;
        context.wait(handle)
    })
}
