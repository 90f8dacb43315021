/*
 * Test utilities and fake transports for smc-temp
 *
 * This module provides a scripted stand-in for the controller service and
 * helpers for building transaction replies, shared by the unit test modules.
 */

#[cfg(test)]
pub mod test_utils {
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::error::SmcError;
    use crate::key::{DataType, SmcKey};
    use crate::protocol::{KeyInfo, SmcKeyData, CMD_READ_BYTES, CMD_READ_KEYINFO, SMC_BYTES_LEN};
    use crate::transport::Transport;

    /// kIOReturnNotFound
    pub const NOT_FOUND: i32 = 0xe00002f0_u32 as i32;

    /// Reply to a `READ_KEYINFO` request.
    pub fn key_info_reply(data_size: u32, data_type: DataType) -> SmcKeyData {
        SmcKeyData { key_info: KeyInfo::new(data_size, data_type), ..SmcKeyData::default() }
    }

    /// Reply to a `READ_BYTES` request.
    pub fn read_bytes_reply(payload: &[u8]) -> SmcKeyData {
        let mut reply = SmcKeyData::default();
        let n = payload.len().min(SMC_BYTES_LEN);
        reply.bytes[..n].copy_from_slice(&payload[..n]);
        reply
    }

    /// Controller with a fixed set of keys. Unknown keys fail with
    /// `NOT_FOUND`, as do data reads of keys marked failing.
    #[derive(Debug, Default)]
    pub struct ScriptedTransport {
        values: HashMap<SmcKey, (KeyInfo, Vec<u8>)>,
        failing_reads: HashSet<SmcKey>,
        calls: Arc<AtomicUsize>,
        closes: Arc<AtomicUsize>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_key(mut self, key: SmcKey, data_type: DataType, payload: &[u8]) -> Self {
            let info = KeyInfo::new(payload.len() as u32, data_type);
            self.values.insert(key, (info, payload.to_vec()));
            self
        }

        /// Key whose metadata resolves but whose data read fails.
        pub fn with_failing_read(mut self, key: SmcKey, data_type: DataType, data_size: u32) -> Self {
            self.values.insert(key, (KeyInfo::new(data_size, data_type), Vec::new()));
            self.failing_reads.insert(key);
            self
        }

        pub fn call_count(&self) -> Arc<AtomicUsize> {
            Arc::clone(&self.calls)
        }

        pub fn close_count(&self) -> Arc<AtomicUsize> {
            Arc::clone(&self.closes)
        }
    }

    impl Transport for ScriptedTransport {
        fn call(&mut self, _index: u32, input: &SmcKeyData) -> Result<SmcKeyData, SmcError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let key = input.smc_key();
            let (info, payload) = self.values.get(&key).ok_or(SmcError::Transport(NOT_FOUND))?;
            match input.sub_command() {
                CMD_READ_KEYINFO => Ok(key_info_reply(info.data_size, info.data_type())),
                CMD_READ_BYTES if self.failing_reads.contains(&key) => Err(SmcError::Transport(NOT_FOUND)),
                CMD_READ_BYTES => Ok(read_bytes_reply(payload)),
                _ => Err(SmcError::Transport(NOT_FOUND)),
            }
        }

        fn close(&mut self) -> Result<(), SmcError> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}
