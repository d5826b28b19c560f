//! Host tool availability checks.

use super::types::CheckResult;

/// Check the host tools the bootstrap shells out to.
pub fn check_host_tools(tar_program: &str, proot_program: &str) -> Vec<CheckResult> {
    vec![
        check_tool(tar_program, "Required to extract the rootfs archive", true),
        check_tool("gzip", "Required by tar to decompress the rootfs archive", true),
        check_tool(
            proot_program,
            "Required for sandbox probes; status will report tools as not installed",
            false,
        ),
    ]
}

/// Check if a tool exists, by PATH lookup or as a direct path.
fn check_tool(tool: &str, purpose: &str, required: bool) -> CheckResult {
    match which::which(tool) {
        Ok(path) => CheckResult::pass_with(tool, path.display().to_string()),
        Err(_) => {
            let msg = format!("Not found. {}", purpose);
            if required {
                CheckResult::fail(tool, msg)
            } else {
                CheckResult::warn(tool, msg)
            }
        }
    }
}
