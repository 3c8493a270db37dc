/// Counts the native handles currently open in this process. Only meaningful while no other test
/// is opening or closing handles, so every test using it must be `#[serial]`.
pub fn open_handle_count() -> usize {
    #[cfg(any(target_os = "linux", target_os = "android"))]
    let fd_dir = "/proc/self/fd";
    #[cfg(all(unix, not(any(target_os = "linux", target_os = "android"))))]
    let fd_dir = "/dev/fd";

    #[cfg(unix)]
    {
        std::fs::read_dir(fd_dir)
            .expect("the descriptor directory should be readable")
            .count()
    }

    #[cfg(windows)]
    {
        use windows_sys::Win32::System::Threading::{GetCurrentProcess, GetProcessHandleCount};

        let mut count = 0_u32;
        // SAFETY: count is a valid out pointer and the pseudo handle never needs closing.
        let ok = unsafe { GetProcessHandleCount(GetCurrentProcess(), &mut count) };
        assert_ne!(ok, 0, "GetProcessHandleCount failed");
        count as usize
    }
}

macro_rules! assert_no_leak {
    ($run:block) => {
        assert_no_leak!($run, "native handles were leaked")
    };
    ($run:block, $msg:literal) => {{
        let before = $crate::util::leak::open_handle_count();
        #[allow(clippy::redundant_closure_call)]
        let result = (|| $run)();
        let after = $crate::util::leak::open_handle_count();
        assert_eq!(before, after, $msg);
        result
    }};
}

pub(crate) use assert_no_leak;
