use std::ffi::c_void;
use std::iter;
use std::ptr;

use tracing::warn;
use windows_sys::Win32::Foundation::{CloseHandle, HANDLE, LocalFree};
use windows_sys::Win32::Security::Authorization::{
    ConvertSidToStringSidW, ConvertStringSecurityDescriptorToSecurityDescriptorW, SDDL_REVISION_1,
};
use windows_sys::Win32::Security::{
    GetTokenInformation, PSECURITY_DESCRIPTOR, PSID, TOKEN_INFORMATION_CLASS,
    TOKEN_PRIMARY_GROUP, TOKEN_QUERY, TOKEN_USER, TokenPrimaryGroup, TokenUser,
};
use windows_sys::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};

use super::{check, last_error};
use crate::handle::Permissions;
use crate::sys::SysResult;

const READ_MASK: u32 = 0x0012_0089;
const WRITE_MASK: u32 = 0x0012_0116;
const EXECUTE_MASK: u32 = 0x0012_00a0;

/// Maps one `rwx` triple to file access rights.
const fn access_mask(rwx: u8) -> u32 {
    let mut mask = 0;
    if rwx & 0o4 != 0 {
        mask |= READ_MASK;
    }
    if rwx & 0o2 != 0 {
        mask |= WRITE_MASK;
    }
    if rwx & 0o1 != 0 {
        mask |= EXECUTE_MASK;
    }
    mask
}

/// A self-relative security descriptor with a protected DACL of three allow entries: the process
/// user, its primary group and everyone.
pub(super) struct SecurityDescriptor(PSECURITY_DESCRIPTOR);

impl SecurityDescriptor {
    pub(super) fn new(permissions: Permissions, directory: bool) -> SysResult<SecurityDescriptor> {
        let token = ProcessToken::open()?;
        let owner = sid_string(token.user_sid()?.sid())?;
        let group = sid_string(token.primary_group_sid()?.sid())?;

        // Directories pass their entries on to new children.
        let inherit = if directory { "OICI" } else { "" };
        let ace = |bits, sid: &str| format!("(A;{inherit};0x{:x};;;{sid})", access_mask(bits));
        let sddl = format!(
            "D:P{}{}{}",
            ace(permissions.owner(), &owner),
            ace(permissions.group(), &group),
            ace(permissions.other(), "WD"),
        );
        let sddl: Vec<u16> = sddl.encode_utf16().chain(iter::once(0)).collect();

        let mut descriptor = ptr::null_mut();
        // SAFETY: sddl is nul-terminated and descriptor is a valid out pointer.
        check(unsafe {
            ConvertStringSecurityDescriptorToSecurityDescriptorW(
                sddl.as_ptr(),
                SDDL_REVISION_1,
                &mut descriptor,
                ptr::null_mut(),
            )
        })?;
        Ok(SecurityDescriptor(descriptor))
    }

    pub(super) fn as_ptr(&self) -> *mut c_void {
        self.0
    }
}

impl Drop for SecurityDescriptor {
    fn drop(&mut self) {
        // SAFETY: The descriptor was allocated with LocalAlloc by the conversion call.
        unsafe { LocalFree(self.0) };
    }
}

struct ProcessToken(HANDLE);

impl ProcessToken {
    fn open() -> SysResult<ProcessToken> {
        let mut token = ptr::null_mut();
        // SAFETY: token is a valid out pointer and the pseudo process handle never needs closing.
        check(unsafe { OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token) })?;
        Ok(ProcessToken(token))
    }

    fn information(&self, class: TOKEN_INFORMATION_CLASS) -> SysResult<TokenInformation> {
        let mut len = 0_u32;
        // The first call only reports the required size, and always fails.
        // SAFETY: A null buffer of length zero is allowed.
        unsafe { GetTokenInformation(self.0, class, ptr::null_mut(), 0, &mut len) };

        // u64 words keep the buffer aligned for the SID structures inside it.
        let mut buf = vec![0_u64; (len as usize).div_ceil(8)];
        // SAFETY: buf is valid for writes of at least len bytes.
        check(unsafe {
            GetTokenInformation(self.0, class, buf.as_mut_ptr().cast(), len, &mut len)
        })?;
        Ok(TokenInformation { class, buf })
    }

    fn user_sid(&self) -> SysResult<TokenInformation> {
        self.information(TokenUser)
    }

    fn primary_group_sid(&self) -> SysResult<TokenInformation> {
        self.information(TokenPrimaryGroup)
    }
}

impl Drop for ProcessToken {
    fn drop(&mut self) {
        // SAFETY: The token handle is owned by this value.
        if unsafe { CloseHandle(self.0) } == 0 {
            warn!(code = ?last_error(), "failed to close process token");
        }
    }
}

struct TokenInformation {
    class: TOKEN_INFORMATION_CLASS,
    buf: Vec<u64>,
}

impl TokenInformation {
    /// The SID inside the buffer, valid as long as `self` is.
    fn sid(&self) -> PSID {
        // SAFETY: GetTokenInformation filled buf with the structure matching class.
        unsafe {
            if self.class == TokenUser {
                (*self.buf.as_ptr().cast::<TOKEN_USER>()).User.Sid
            } else {
                (*self.buf.as_ptr().cast::<TOKEN_PRIMARY_GROUP>()).PrimaryGroup
            }
        }
    }
}

fn sid_string(sid: PSID) -> SysResult<String> {
    let mut wide = ptr::null_mut();
    // SAFETY: sid is a valid SID and wide is a valid out pointer.
    check(unsafe { ConvertSidToStringSidW(sid, &mut wide) })?;

    // SAFETY: On success wide is a nul-terminated string allocated with LocalAlloc.
    let string = unsafe {
        let len = (0..).take_while(|&i| *wide.add(i) != 0).count();
        String::from_utf16_lossy(std::slice::from_raw_parts(wide, len))
    };
    // SAFETY: wide isn't used again.
    unsafe { LocalFree(wide.cast()) };
    Ok(string)
}
