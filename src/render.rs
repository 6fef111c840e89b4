//! C source rendering of encoded bytes

/// Name of the generated array
pub const SYMBOL: &str = "DEFAULT_JOB_PARAMETERS";

/// Header the generated source depends on for `uint8_t`
pub const INCLUDE: &str = "#include <stdint.h>";

/// Render bytes as a compilable C translation unit declaring one static
/// `uint8_t` array.
///
/// ```
/// let source = jobfig::render::render(&[0x08, 0xac, 0x02]);
/// assert_eq!(
///     source,
///     "#include <stdint.h>\n\nstatic const uint8_t DEFAULT_JOB_PARAMETERS[] = {0x08, 0xac, 0x02};\n"
/// );
/// ```
pub fn render(bytes: &[u8]) -> String {
    let body = bytes
        .iter()
        .map(|b| format!("{b:#04x}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{INCLUDE}\n\nstatic const uint8_t {SYMBOL}[] = {{{body}}};\n")
}

/// Recover the array contents from rendered source.
///
/// Returns `None` if the text does not contain a declaration of
/// [`SYMBOL`] whose elements are all `0xNN` literals.
pub fn literal_bytes(source: &str) -> Option<Vec<u8>> {
    let decl = format!("{}[] = {{", SYMBOL);
    let start = source.find(&decl)? + decl.len();
    let body = &source[start..];
    let body = &body[..body.find("};")?];

    if body.trim().is_empty() {
        return Some(Vec::new());
    }
    body.split(',')
        .map(|item| {
            let hex = item.trim().strip_prefix("0x")?;
            if hex.len() != 2 {
                return None;
            }
            u8::from_str_radix(hex, 16).ok()
        })
        .collect()
}
