use logos::Logos;

/// Lexes `token` as exactly one `T`. Anything left over after the first
/// token, or any byte sequence that isn't UTF-8, is not a match.
pub(crate) fn lex_exact<'a, T>(token: &'a [u8]) -> Option<T>
where
    T: Logos<'a, Source = str>,
    T::Extras: Default,
{
    let text = std::str::from_utf8(token).ok()?;
    let mut lexer = T::lexer(text);
    let kind = lexer.next()?.ok()?;

    lexer.remainder().is_empty().then_some(kind)
}
