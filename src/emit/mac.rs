//! macOS PPP `ip-up` / `ip-down` hooks

use super::{Emitter, Platform, Script, ScriptSet};
use crate::block::AddressBlock;

pub const UP_SCRIPT: &str = "ip-up";
pub const DOWN_SCRIPT: &str = "ip-down";

const UP_HEADER: &str = r#"#!/bin/sh
export PATH="/bin:/sbin:/usr/sbin:/usr/bin"
OLDGW=`netstat -nr | grep '^default' | grep -v 'ppp' | sed 's/default *\([0-9\.]*\) .*/\1/'`
if [ ! -e /tmp/pptp_oldgw ]; then
    echo "${OLDGW}" > /tmp/pptp_oldgw
fi
dscacheutil -flushcache
"#;

const DOWN_HEADER: &str = r#"#!/bin/sh
export PATH="/bin:/sbin:/usr/sbin:/usr/bin"
if [ ! -e /tmp/pptp_oldgw ]; then
        exit 0
fi
OLDGW=`cat /tmp/pptp_oldgw`
"#;

const DOWN_FOOTER: &str = "\n\nrm /tmp/pptp_oldgw\n";

pub struct MacEmitter;

impl Emitter for MacEmitter {
    fn platform(&self) -> Platform {
        Platform::Mac
    }

    fn render(&self, blocks: &[AddressBlock], _metric: u32) -> ScriptSet {
        let mut up = Script::new(UP_SCRIPT, true, UP_HEADER);
        let mut down = Script::new(DOWN_SCRIPT, true, DOWN_HEADER);

        for block in blocks {
            up.push_line(&format!(
                "route add {}/{} \"${{OLDGW}}\"",
                block.network, block.prefix_len
            ));
            down.push_line(&format!(
                "route delete {}/{} ${{OLDGW}}",
                block.network, block.prefix_len
            ));
        }

        down.push_str(DOWN_FOOTER);

        ScriptSet::new(vec![up, down])
    }
}
