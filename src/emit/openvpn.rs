//! OpenVPN `--up` / `--down` hooks
//!
//! The up script captures the current default gateway and feeds the route
//! list to a single `ip -batch` invocation.

use super::{Emitter, Platform, Script, ScriptSet};
use crate::block::AddressBlock;

pub const UP_SCRIPT: &str = "vpn-up.sh";
pub const DOWN_SCRIPT: &str = "vpn-down.sh";

const UP_HEADER: &str = r#"#!/bin/bash -
export PATH="/bin:/sbin:/usr/sbin:/usr/bin"
OLDGW=$(ip route show 0/0 | sed -e 's/^default//')
ip -batch - <<EOF
"#;

const DOWN_HEADER: &str = r#"#!/bin/bash -
export PATH="/bin:/sbin:/usr/sbin:/usr/bin"
ip -batch - <<EOF
"#;

pub struct OpenVpnEmitter;

impl Emitter for OpenVpnEmitter {
    fn platform(&self) -> Platform {
        Platform::OpenVpn
    }

    fn render(&self, blocks: &[AddressBlock], _metric: u32) -> ScriptSet {
        let mut up = Script::new(UP_SCRIPT, true, UP_HEADER);
        let mut down = Script::new(DOWN_SCRIPT, true, DOWN_HEADER);

        for block in blocks {
            up.push_line(&format!("route add {}/{} $OLDGW", block.network, block.prefix_len));
            down.push_line(&format!("route del {}/{}", block.network, block.prefix_len));
        }

        up.push_line("EOF");
        down.push_line("EOF");

        ScriptSet::new(vec![up, down])
    }
}
