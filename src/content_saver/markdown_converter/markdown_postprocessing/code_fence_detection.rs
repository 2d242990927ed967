//! Fence detection for code blocks and display-math blocks.

/// Code fence state to track fence type and character count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeFence {
    pub char: char,         // '`' or '~'
    pub count: usize,       // Number of characters in the fence
    pub line_number: usize, // Line number where the fence opened
}

/// Detect code fence marker at the start of a line
/// Returns Some((char, count)) if the line starts with 3+ backticks or tildes
pub fn detect_code_fence(line: &str) -> Option<(char, usize)> {
    let trimmed = line.trim_start();

    for fence_char in ['`', '~'] {
        if trimmed.starts_with(fence_char) {
            let count = trimmed.chars().take_while(|&c| c == fence_char).count();
            if count >= 3 {
                return Some((fence_char, count));
            }
        }
    }

    None
}

/// Detect a display-math delimiter line (`$$` on its own)
pub fn is_math_fence(line: &str) -> bool {
    line.trim() == "$$"
}
