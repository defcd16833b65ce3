//! Windows batch files
//!
//! The up script reads the current default gateway from `route print` into
//! `%gw%`. Batch files need no executable bit.

use super::{Emitter, Platform, Script, ScriptSet};
use crate::block::AddressBlock;

pub const UP_SCRIPT: &str = "vpnup.bat";
pub const DOWN_SCRIPT: &str = "vpndown.bat";

const UP_HEADER: &str = r#"@echo off
for /F "tokens=3" %%* in ('route print ^| findstr "\<0.0.0.0\>"') do set "gw=%%*"
ipconfig /flushdns

"#;

const DOWN_HEADER: &str = "@echo off\n";

pub struct WindowsEmitter;

impl Emitter for WindowsEmitter {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    fn render(&self, blocks: &[AddressBlock], metric: u32) -> ScriptSet {
        let mut up = Script::new(UP_SCRIPT, false, UP_HEADER);
        let mut down = Script::new(DOWN_SCRIPT, false, DOWN_HEADER);

        for block in blocks {
            up.push_line(&format!(
                "route add {} mask {} %gw% metric {}",
                block.network, block.netmask, metric
            ));
            down.push_line(&format!("route delete {}", block.network));
        }

        ScriptSet::new(vec![up, down])
    }
}
