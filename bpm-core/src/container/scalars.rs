use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::options::DecodeOptions;
use crate::util::cursor::ByteCursor;

/// Top-level fields between the meta run and the first section. Fixed order,
/// nothing optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarFields {
    pub app_name: String,
    pub build_version: String,
    pub launch_exe: String,
    pub launch_command: String,
    pub prereq_ids: Vec<String>,
    pub prereq_name: String,
    pub prereq_path: String,
    pub prereq_args: String,
}

impl ScalarFields {
    pub fn read_from(c: &mut ByteCursor<'_>, opts: &DecodeOptions) -> Result<Self> {
        let out = Self {
            app_name: c.read_string()?,
            build_version: c.read_string()?,
            launch_exe: c.read_string()?,
            launch_command: c.read_string()?,
            prereq_ids: c.read_string_array(opts.max_elements)?,
            prereq_name: c.read_string()?,
            prereq_path: c.read_string()?,
            prereq_args: c.read_string()?,
        };
        debug!(
            app = %out.app_name,
            build = %out.build_version,
            prereqs = out.prereq_ids.len(),
            end = c.position(),
            "scalar fields"
        );
        Ok(out)
    }
}
