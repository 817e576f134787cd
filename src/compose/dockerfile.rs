//! Rendering of ordered features into build and test scripts.

use crate::core::Feature;

/// Render a Dockerfile from features already in dependency order.
///
/// A `FROM <base>` line comes first when a base image is given. Each
/// feature then contributes its fragment as one block, with trailing
/// newlines trimmed; empty fragments are skipped. Blocks are separated by a
/// newline and the result ends with a newline unless it is empty.
#[must_use]
pub fn render_dockerfile(base_image: Option<&str>, ordered: &[&Feature]) -> String {
    let header = base_image
        .map(str::trim)
        .filter(|base| !base.is_empty())
        .map(|base| format!("FROM {base}"));
    let blocks = ordered.iter().map(|feature| feature.docker_data.as_str());
    join_blocks(header.into_iter().chain(blocks.map(str::to_string)))
}

/// Render the test script from the features' test snippets, in order.
///
/// Returns `None` when no feature carries a test snippet.
#[must_use]
pub fn render_test_script(ordered: &[&Feature]) -> Option<String> {
    let snippets: Vec<String> =
        ordered.iter().filter_map(|feature| feature.test_snippet.clone()).collect();
    let script = join_blocks(snippets);
    (!script.is_empty()).then_some(script)
}

fn join_blocks<I>(blocks: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let blocks: Vec<String> = blocks
        .into_iter()
        .map(|block| block.trim_end_matches(['\n', '\r']).to_string())
        .filter(|block| !block.trim().is_empty())
        .collect();

    if blocks.is_empty() {
        String::new()
    } else {
        let mut out = blocks.join("\n");
        out.push('\n');
        out
    }
}
