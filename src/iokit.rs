/*
 * This file is part of smc-temp.
 *
 * Copyright (C) 2025 smc-temp contributors
 *
 * smc-temp is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * smc-temp is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with smc-temp. If not, see <https://www.gnu.org/licenses/>.
 */

//! AppleSMC transport over the IOKit user-client interface (macOS only).

use std::ffi::c_void;
use std::mem::size_of;
use std::os::raw::c_char;

use libc::{kern_return_t, mach_port_t};
use serde_json::json;

use crate::error::SmcError;
use crate::logger;
use crate::protocol::SmcKeyData;
use crate::transport::Transport;

type IoObject = mach_port_t;
type IoConnect = mach_port_t;

const KIO_RETURN_SUCCESS: kern_return_t = 0;
const KIO_MAIN_PORT_DEFAULT: mach_port_t = 0;
const SMC_SERVICE_NAME: &[u8] = b"AppleSMC\0";

#[link(name = "IOKit", kind = "framework")]
extern "C" {
    fn IOServiceMatching(name: *const c_char) -> *mut c_void;
    fn IOServiceGetMatchingServices(
        main_port: mach_port_t,
        matching: *mut c_void,
        existing: *mut IoObject,
    ) -> kern_return_t;
    fn IOIteratorNext(iterator: IoObject) -> IoObject;
    fn IOObjectRelease(object: IoObject) -> kern_return_t;
    fn IOServiceOpen(
        service: IoObject,
        owning_task: mach_port_t,
        kind: u32,
        connect: *mut IoConnect,
    ) -> kern_return_t;
    fn IOServiceClose(connect: IoConnect) -> kern_return_t;
    fn IOConnectCallStructMethod(
        connection: IoConnect,
        selector: u32,
        input: *const c_void,
        input_size: usize,
        output: *mut c_void,
        output_size: *mut usize,
    ) -> kern_return_t;
}

/// Connection to the first `AppleSMC` service instance.
#[derive(Debug)]
pub struct IoKitTransport {
    conn: IoConnect,
}

impl IoKitTransport {
    pub fn open() -> Result<Self, SmcError> {
        let mut iterator: IoObject = 0;
        // SAFETY: the name is NUL-terminated; the matching dictionary is
        // consumed by IOServiceGetMatchingServices.
        let result = unsafe {
            let matching = IOServiceMatching(SMC_SERVICE_NAME.as_ptr() as *const c_char);
            IOServiceGetMatchingServices(KIO_MAIN_PORT_DEFAULT, matching, &mut iterator)
        };
        if result != KIO_RETURN_SUCCESS {
            logger::log_event("smc_open_error", json!({ "stage": "matching", "code": result }));
            return Err(SmcError::ServiceLookupFailed(result));
        }

        // SAFETY: iterator is a valid object returned above and released once.
        let device = unsafe {
            let device = IOIteratorNext(iterator);
            IOObjectRelease(iterator);
            device
        };
        if device == 0 {
            logger::log_event("smc_open_error", json!({ "stage": "iterate" }));
            return Err(SmcError::ServiceUnavailable);
        }

        let mut conn: IoConnect = 0;
        // SAFETY: device is a live service object, released after the open attempt.
        let result = unsafe {
            #[allow(deprecated)]
            let task = libc::mach_task_self();
            let r = IOServiceOpen(device, task, 0, &mut conn);
            IOObjectRelease(device);
            r
        };
        if result != KIO_RETURN_SUCCESS {
            logger::log_event("smc_open_error", json!({ "stage": "open", "code": result }));
            return Err(SmcError::ServiceOpenFailed(result));
        }

        logger::log_event("smc_open", json!({ "conn": conn }));
        Ok(Self { conn })
    }
}

impl Transport for IoKitTransport {
    fn call(&mut self, index: u32, input: &SmcKeyData) -> Result<SmcKeyData, SmcError> {
        let mut output = SmcKeyData::default();
        let mut output_size = size_of::<SmcKeyData>();
        // SAFETY: both buffers are repr(C) SmcKeyData matching the driver's
        // structure and live for the duration of the call.
        let result = unsafe {
            IOConnectCallStructMethod(
                self.conn,
                index,
                input as *const SmcKeyData as *const c_void,
                size_of::<SmcKeyData>(),
                &mut output as *mut SmcKeyData as *mut c_void,
                &mut output_size,
            )
        };
        if result != KIO_RETURN_SUCCESS {
            return Err(SmcError::Transport(result));
        }
        Ok(output)
    }

    fn close(&mut self) -> Result<(), SmcError> {
        // SAFETY: conn was obtained from IOServiceOpen; Smc closes at most once.
        let result = unsafe { IOServiceClose(self.conn) };
        if result != KIO_RETURN_SUCCESS {
            return Err(SmcError::Transport(result));
        }
        logger::log_event("smc_close", json!({ "conn": self.conn }));
        Ok(())
    }
}
