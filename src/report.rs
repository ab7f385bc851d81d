use crate::{driver::Site, error::Result};
use ariadne::{Color, Label, Report, ReportKind, Source};
use tracing::warn;

/// Converts a byte range into the char range ariadne expects.
fn char_span(text: &str, span: &std::ops::Range<usize>) -> std::ops::Range<usize> {
    let start = text[..span.start].chars().count();
    start..start + text[span.clone()].chars().count()
}

fn headline(site: &Site) -> String {
    format!(
        "line {}: `{}` rewritten through {}",
        site.line, site.mnemonic, site.via
    )
}

/// Prints an advice report on stderr for every rewritten site.
pub fn explain(filename: &str, input: &[u8], sites: &[Site]) -> Result<()> {
    let text = match std::str::from_utf8(input) {
        Ok(text) => text,
        Err(e) => {
            warn!("input is not valid UTF-8, skipping rewrite report: {e}");
            return Ok(());
        }
    };

    let mut cache = (filename, Source::from(text));

    for site in sites {
        let span = char_span(text, &site.span);

        Report::build(ReportKind::Advice, filename, span.start)
            .with_message(headline(site))
            .with_label(
                Label::new((filename, span))
                    .with_message(format!(
                        "{} is exchanged with {} around the instruction",
                        site.destination, site.via
                    ))
                    .with_color(Color::Green),
            )
            .finish()
            .eprint(&mut cache)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mnemonic::Mnemonic, register::Register};

    #[test]
    fn char_span_counts_multibyte() {
        let text = "é\tincq\t%rbx\n";
        let start = text.find('%').unwrap();

        assert_eq!(char_span(text, &(start..start + 4)), 7..11);
    }

    #[test]
    fn headline_names_the_line() {
        let site = Site {
            line: 12,
            span: 40..44,
            mnemonic: Mnemonic::Addq,
            destination: Register::Rbx,
            via: Register::R8,
        };

        assert_eq!(headline(&site), "line 12: `addq` rewritten through %r8");
    }
}
