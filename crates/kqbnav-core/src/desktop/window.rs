//! Top-level window management
//!
//! Win32 on Windows. Other platforms get a stand-in that reports no windows.

#[cfg(windows)]
pub use win32::Win32Windows as NativeWindows;

#[cfg(not(windows))]
pub use fallback::NoWindows as NativeWindows;

#[cfg(windows)]
mod win32 {
    use tracing::warn;
    use windows::Win32::Foundation::{BOOL, HWND, LPARAM, TRUE, WPARAM};
    use windows::Win32::UI::WindowsAndMessaging::{
        EnumWindows, GetForegroundWindow, GetWindowTextW, IsWindowVisible, PostMessageW,
        SetForegroundWindow, WM_CLOSE,
    };

    use crate::error::{NavError, Result};
    use crate::host::{WindowHandle, WindowSystem};

    /// Visible top-level windows of the current desktop
    #[derive(Debug, Default)]
    pub struct Win32Windows;

    unsafe extern "system" fn collect_visible(hwnd: HWND, lparam: LPARAM) -> BOOL {
        let handles = &mut *(lparam.0 as *mut Vec<isize>);
        if IsWindowVisible(hwnd).as_bool() {
            handles.push(hwnd.0 as isize);
        }
        TRUE
    }

    fn hwnd(handle: WindowHandle) -> HWND {
        HWND(handle.0 as *mut _)
    }

    impl WindowSystem for Win32Windows {
        fn windows(&self) -> Result<Vec<WindowHandle>> {
            let mut handles: Vec<isize> = Vec::new();
            unsafe {
                EnumWindows(
                    Some(collect_visible),
                    LPARAM(&mut handles as *mut Vec<isize> as isize),
                )
            }
            .map_err(|e| NavError::Window(e.to_string()))?;
            Ok(handles.into_iter().map(WindowHandle).collect())
        }

        fn title(&self, handle: WindowHandle) -> String {
            let mut buf = [0u16; 512];
            let len = unsafe { GetWindowTextW(hwnd(handle), &mut buf) };
            String::from_utf16_lossy(&buf[..len.max(0) as usize])
        }

        fn foreground(&self) -> Option<WindowHandle> {
            let fg = unsafe { GetForegroundWindow() };
            if fg.0.is_null() {
                None
            } else {
                Some(WindowHandle(fg.0 as isize))
            }
        }

        fn set_foreground(&mut self, handle: WindowHandle) -> Result<()> {
            // Windows may refuse focus stealing; the caller checks the foreground afterwards
            if !unsafe { SetForegroundWindow(hwnd(handle)) }.as_bool() {
                warn!(handle = handle.0, "SetForegroundWindow refused");
            }
            Ok(())
        }

        fn close(&mut self, handle: WindowHandle) -> Result<()> {
            unsafe { PostMessageW(hwnd(handle), WM_CLOSE, WPARAM(0), LPARAM(0)) }
                .map_err(|e| NavError::Window(e.to_string()))
        }
    }
}

#[cfg(not(windows))]
mod fallback {
    use tracing::debug;

    use crate::error::Result;
    use crate::host::{WindowHandle, WindowSystem};

    /// Window system that never reports a window
    #[derive(Debug, Default)]
    pub struct NoWindows;

    impl WindowSystem for NoWindows {
        fn windows(&self) -> Result<Vec<WindowHandle>> {
            debug!("Window enumeration unsupported on this platform");
            Ok(Vec::new())
        }

        fn title(&self, _handle: WindowHandle) -> String {
            String::new()
        }

        fn foreground(&self) -> Option<WindowHandle> {
            None
        }

        fn set_foreground(&mut self, _handle: WindowHandle) -> Result<()> {
            Ok(())
        }

        fn close(&mut self, _handle: WindowHandle) -> Result<()> {
            Ok(())
        }
    }

}
