//! Linux PPP `ip-pre-up` / `ip-down` hooks
//!
//! The up script stashes the original gateway in `/tmp/vpn_oldgw` so the
//! down script can still find it once the tunnel owns the default route.

use super::{Emitter, Platform, Script, ScriptSet};
use crate::block::AddressBlock;

pub const UP_SCRIPT: &str = "ip-pre-up";
pub const DOWN_SCRIPT: &str = "ip-down";

const UP_HEADER: &str = r#"#!/bin/bash -
OLDGW=$(ip route show 0/0 | head -n1 | grep 'via' | grep -Po '\d+\.\d+\.\d+\.\d+')
if [ $OLDGW == '' ]; then
    exit 0
fi
if [ ! -e /tmp/vpn_oldgw ]; then
    echo $OLDGW > /tmp/vpn_oldgw
fi
ip -batch - <<EOF
"#;

const DOWN_HEADER: &str = r#"#!/bin/bash
export PATH="/bin:/sbin:/usr/sbin:/usr/bin"
OLDGW=$(cat /tmp/vpn_oldgw)
ip -batch - <<EOF
"#;

const DOWN_FOOTER: &str = "EOF\nrm /tmp/vpn_oldgw\n";

pub struct LinuxEmitter;

impl Emitter for LinuxEmitter {
    fn platform(&self) -> Platform {
        Platform::Linux
    }

    fn render(&self, blocks: &[AddressBlock], metric: u32) -> ScriptSet {
        let mut up = Script::new(UP_SCRIPT, true, UP_HEADER);
        let mut down = Script::new(DOWN_SCRIPT, true, DOWN_HEADER);

        for block in blocks {
            up.push_line(&format!(
                "route add {}/{} via $OLDGW metric {}",
                block.network, block.prefix_len, metric
            ));
            down.push_line(&format!("route del {}/{}", block.network, block.prefix_len));
        }

        up.push_line("EOF");
        down.push_str(DOWN_FOOTER);

        ScriptSet::new(vec![up, down])
    }
}
