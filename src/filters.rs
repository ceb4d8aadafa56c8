use askama::Result;

// Template filter so nav links can check `permissions|contains("key")`.
#[allow(clippy::unnecessary_wraps)]
pub fn contains(s: &Vec<String>, v: &str) -> Result<bool> {
    Ok(s.contains(&v.to_string()))
}
