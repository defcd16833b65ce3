//! Legacy OpenVPN client config `route` directives

use super::{Emitter, Platform, Script, ScriptSet};
use crate::block::AddressBlock;

pub const ROUTES_FILE: &str = "routes.txt";

/// Headroom above the generated routes for routes pushed by the server
const EXTRA_ROUTES: usize = 20;

pub struct OldEmitter;

impl Emitter for OldEmitter {
    fn platform(&self) -> Platform {
        Platform::Old
    }

    fn render(&self, blocks: &[AddressBlock], metric: u32) -> ScriptSet {
        let header = format!("max-routes {}\n\n", blocks.len() + EXTRA_ROUTES);
        let mut routes = Script::new(ROUTES_FILE, false, &header);

        for block in blocks {
            routes.push_line(&format!(
                "route {} {} net_gateway {}",
                block.network, block.netmask, metric
            ));
        }

        ScriptSet::new(vec![routes])
    }
}
