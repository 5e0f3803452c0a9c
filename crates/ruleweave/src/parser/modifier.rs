//! Parsing of modifier invocations such as `s` or `replace(a,b)`.

/// A modifier invocation split into its name and parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierCall<'a> {
    pub name: &'a str,
    /// Parameters in call order. Whitespace is kept as written.
    pub params: Vec<&'a str>,
}

/// Split a modifier spec into name and parameters.
///
/// `name()` has no parameters. A spec without a well-formed parameter list is
/// treated as a bare name.
pub fn parse_modifier_call(spec: &str) -> ModifierCall<'_> {
    let bare = ModifierCall {
        name: spec,
        params: Vec::new(),
    };
    let Some(body) = spec.strip_suffix(')') else {
        return bare;
    };
    let Some((name, params)) = body.split_once('(') else {
        return bare;
    };
    if name.is_empty() {
        return bare;
    }
    let params = if params.is_empty() {
        Vec::new()
    } else {
        params.split(',').collect()
    };
    ModifierCall { name, params }
}
