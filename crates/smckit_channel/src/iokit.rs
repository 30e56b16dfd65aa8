//! IOKit-backed driver channel (macOS only).
//!
//! The only `unsafe` in the workspace lives here, at the FFI seam. The
//! driver is reached through `IOConnectCallStructMethod` at kernel index 2
//! against the `AppleSMC` service, round-tripping one [`KeyData`] record
//! per call.

use crate::channel::DriverChannel;
use crate::error::{ChannelError, ChannelResult, KERN_NOT_PRIVILEGED, KERN_SUCCESS};
use crate::wire::KeyData;
use std::ffi::c_void;
use std::mem;
use std::os::raw::c_char;

type MachPort = u32;
type IoObject = u32;
type KernReturn = i32;

/// Method index of the SMC call handler inside the kext.
const KERNEL_INDEX: u32 = 2;

/// Matching name of the SMC service, NUL-terminated.
const SERVICE_NAME: &[u8] = b"AppleSMC\0";

/// The main IOKit port; a zero port is interpreted as the default.
const MAIN_PORT: MachPort = 0;

#[link(name = "IOKit", kind = "framework")]
extern "C" {
    fn IOServiceMatching(name: *const c_char) -> *mut c_void;
    fn IOServiceGetMatchingService(main_port: MachPort, matching: *mut c_void) -> IoObject;
    fn IOServiceOpen(
        service: IoObject,
        owning_task: MachPort,
        conn_type: u32,
        connect: *mut IoObject,
    ) -> KernReturn;
    fn IOServiceClose(connect: IoObject) -> KernReturn;
    fn IOObjectRelease(object: IoObject) -> KernReturn;
    fn IOConnectCallStructMethod(
        connection: IoObject,
        selector: u32,
        input_struct: *const c_void,
        input_struct_size: usize,
        output_struct: *mut c_void,
        output_struct_size: *mut usize,
    ) -> KernReturn;
}

extern "C" {
    static mach_task_self_: MachPort;
}

const fn map_kern(code: KernReturn) -> ChannelError {
    match code {
        KERN_NOT_PRIVILEGED => ChannelError::NotPrivileged,
        code => ChannelError::Transport { code },
    }
}

/// A channel to the real controller via IOKit.
///
/// The connection is established by [`DriverChannel::open`] and released by
/// [`DriverChannel::close`] or on drop.
#[derive(Debug, Default)]
pub struct IoKitChannel {
    connect: IoObject,
    open: bool,
}

impl IoKitChannel {
    /// Creates an unopened channel.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            connect: 0,
            open: false,
        }
    }
}

impl DriverChannel for IoKitChannel {
    fn open(&mut self) -> ChannelResult<()> {
        if self.open {
            return Ok(());
        }

        let service = unsafe {
            IOServiceGetMatchingService(MAIN_PORT, IOServiceMatching(SERVICE_NAME.as_ptr().cast()))
        };
        if service == 0 {
            return Err(ChannelError::ServiceNotFound);
        }

        let mut connect: IoObject = 0;
        let ret = unsafe { IOServiceOpen(service, mach_task_self_, 0, &mut connect) };
        unsafe {
            IOObjectRelease(service);
        }
        if ret != KERN_SUCCESS {
            return Err(map_kern(ret));
        }

        self.connect = connect;
        self.open = true;
        Ok(())
    }

    fn close(&mut self) -> ChannelResult<()> {
        if !self.open {
            return Ok(());
        }
        let ret = unsafe { IOServiceClose(self.connect) };
        self.open = false;
        self.connect = 0;
        if ret != KERN_SUCCESS {
            return Err(map_kern(ret));
        }
        Ok(())
    }

    fn call(&mut self, input: &KeyData) -> ChannelResult<KeyData> {
        if !self.open {
            return Err(ChannelError::Closed);
        }

        let mut output = KeyData::default();
        let mut output_size = mem::size_of::<KeyData>();
        let ret = unsafe {
            IOConnectCallStructMethod(
                self.connect,
                KERNEL_INDEX,
                (input as *const KeyData).cast(),
                mem::size_of::<KeyData>(),
                (&mut output as *mut KeyData).cast(),
                &mut output_size,
            )
        };
        if ret != KERN_SUCCESS {
            return Err(map_kern(ret));
        }
        Ok(output)
    }
}

impl Drop for IoKitChannel {
    fn drop(&mut self) {
        if self.open {
            unsafe {
                IOServiceClose(self.connect);
            }
        }
    }
}
