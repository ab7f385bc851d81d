use crate::{
    error::{Error, Result},
    mnemonic::Mnemonic,
    register::Register,
    rewriter::{rewrite_line, Outcome, Passthrough},
};
use std::{
    collections::BTreeMap,
    fs::{File, OpenOptions},
    io::{self, Read, Write},
    ops::Range,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

const CHUNK_SIZE: usize = 8192;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    /// `-` names standard input.
    pub fn from_arg(arg: Option<PathBuf>) -> Self {
        match arg {
            Some(path) if path.as_os_str() != "-" => Input::File(path),
            _ => Input::Stdin,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Input::Stdin => "<stdin>".to_string(),
            Input::File(path) => path.display().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Stdout,
    File(PathBuf),
}

/// A rewritten line, located in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub line: usize,
    /// Byte range of the destination register in the whole input.
    pub span: Range<usize>,
    pub mnemonic: Mnemonic,
    pub destination: Register,
    pub via: Register,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub lines: usize,
    pub rewritten: usize,
    pub verbatim: BTreeMap<Passthrough, usize>,
}

impl Summary {
    pub fn verbatim_total(&self) -> usize {
        self.verbatim.values().sum()
    }
}

#[derive(Debug, Default)]
pub struct Rewritten {
    pub output: Vec<u8>,
    pub summary: Summary,
    pub sites: Vec<Site>,
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    let len = file.metadata().map_err(|e| Error::io(path, e))?.len();

    let mut buffer = vec![];
    buffer.try_reserve_exact(len as usize)?;
    file.read_to_end(&mut buffer)
        .map_err(|e| Error::io(path, e))?;

    Ok(buffer)
}

/// Reads `reader` to the end in fixed-size chunks.
pub fn read_chunked(reader: &mut impl Read) -> Result<Vec<u8>> {
    let mut buffer = vec![];
    let mut chunk = [0u8; CHUNK_SIZE];

    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        buffer.try_reserve(n)?;
        buffer.extend_from_slice(&chunk[..n]);
    }

    Ok(buffer)
}

pub fn read_input(input: &Input) -> Result<Vec<u8>> {
    let buffer = match input {
        Input::Stdin => read_chunked(&mut io::stdin().lock())?,
        Input::File(path) => read_file(path)?,
    };

    debug!(input = %input.name(), bytes = buffer.len(), "read input");
    Ok(buffer)
}

/// Runs every line of `input` through the rewriter, in order.
pub fn rewrite(input: &[u8]) -> Result<Rewritten> {
    let mut result = Rewritten::default();
    result.output.try_reserve((input.len() + 1) * 4)?;

    let mut offset = 0;
    for (index, line) in input.split_inclusive(|&b| b == b'\n').enumerate() {
        result.summary.lines += 1;

        match rewrite_line(line, &mut result.output)? {
            Outcome::Rewritten(rewrite) => {
                result.summary.rewritten += 1;
                result.sites.push(Site {
                    line: index + 1,
                    span: offset + rewrite.destination_span.start
                        ..offset + rewrite.destination_span.end,
                    mnemonic: rewrite.mnemonic,
                    destination: rewrite.destination,
                    via: rewrite.via(),
                });
            }
            Outcome::Verbatim(reason) => {
                *result.summary.verbatim.entry(reason).or_default() += 1;
            }
        }

        offset += line.len();
    }

    info!(
        lines = result.summary.lines,
        rewritten = result.summary.rewritten,
        verbatim = result.summary.verbatim_total(),
        "rewrite finished"
    );

    Ok(result)
}

/// Opens the destination up front so a bad path fails before any work.
pub fn open_output(output: &Output) -> Result<Box<dyn Write>> {
    match output {
        Output::Stdout => Ok(Box::new(io::stdout().lock())),
        Output::File(path) => {
            let mut options = OpenOptions::new();
            options.read(true).write(true).create(true).truncate(true);

            #[cfg(unix)]
            {
                use std::os::unix::fs::OpenOptionsExt;
                options.mode(0o644);
            }

            let file = options.open(path).map_err(|e| Error::io(path, e))?;
            Ok(Box::new(file))
        }
    }
}

pub fn write_output(writer: &mut dyn Write, bytes: &[u8]) -> Result<()> {
    writer.write_all(bytes)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn input_from_arg() {
        assert_eq!(Input::from_arg(None), Input::Stdin);
        assert_eq!(Input::from_arg(Some("-".into())), Input::Stdin);
        assert_eq!(
            Input::from_arg(Some("a.s".into())),
            Input::File("a.s".into())
        );
    }

    #[test]
    fn empty_input() {
        let result = rewrite(b"").unwrap();

        assert!(result.output.is_empty());
        assert_eq!(result.summary, Summary::default());
    }

    #[test]
    fn mixed_input() {
        let input = "main:\n\tmovq\t%rax, %rbx\n\tret\n";
        let result = rewrite(input.as_bytes()).unwrap();

        assert_eq!(
            String::from_utf8(result.output).unwrap(),
            "main:\n\txchgq\t%rbx, %rax\n\tmovq\t%rbx, %rax\n\txchgq\t%rbx, %rax\n\tret\n"
        );
        assert_eq!(result.summary.lines, 3);
        assert_eq!(result.summary.rewritten, 1);
        assert_eq!(result.summary.verbatim[&Passthrough::NotInstruction], 1);
        assert_eq!(result.summary.verbatim[&Passthrough::UnknownMnemonic], 1);

        let site = &result.sites[0];
        assert_eq!(site.line, 2);
        assert_eq!(&input[site.span.clone()], "%rbx");
        assert_eq!(site.via, Register::Rax);
    }

    #[test]
    fn ineligible_input_is_unchanged_twice() {
        let input = "\t.text\nfoo:\n\tcmpq\t$1, %rbx\n\tmovq\t%rcx, %rbx\n\tret";
        let once = rewrite(input.as_bytes()).unwrap().output;
        let twice = rewrite(&once).unwrap().output;

        assert_eq!(once, input.as_bytes());
        assert_eq!(twice, once);
    }

    #[test]
    fn non_utf8_lines_pass_through() {
        let input = b"\t.ascii\t\"\xff\xfe\"\n\tincq\t%rbx\n";
        let result = rewrite(input).unwrap();

        assert!(result.output.starts_with(b"\t.ascii\t\"\xff\xfe\"\n"));
        assert_eq!(result.summary.rewritten, 1);
    }

    #[test]
    fn read_in_chunks() {
        let data = "\tnop\n".repeat(CHUNK_SIZE);
        let buffer = read_chunked(&mut Cursor::new(data.as_bytes())).unwrap();

        assert_eq!(buffer, data.as_bytes());
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("in.s");
        let output_path = dir.path().join("out.s");
        std::fs::write(&input_path, "\tincl\t%r11d\n").unwrap();

        let input = read_input(&Input::File(input_path)).unwrap();
        let result = rewrite(&input).unwrap();
        let mut writer = open_output(&Output::File(output_path.clone())).unwrap();
        write_output(&mut writer, &result.output).unwrap();
        drop(writer);

        assert_eq!(
            std::fs::read_to_string(&output_path).unwrap(),
            "\txchgl\t%r11d, %eax\n\tincl\t%eax\n\txchgl\t%r11d, %eax\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn output_is_truncated_with_owner_write_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.s");
        std::fs::write(&path, "stale contents that are longer\n").unwrap();

        let mut writer = open_output(&Output::File(path.clone())).unwrap();
        write_output(&mut writer, b"\tret\n").unwrap();
        drop(writer);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "\tret\n");

        let fresh = dir.path().join("fresh.s");
        drop(open_output(&Output::File(fresh.clone())).unwrap());
        let mode = std::fs::metadata(&fresh).unwrap().permissions().mode();
        assert_eq!(mode & 0o600, 0o600);
        assert_eq!(mode & 0o022, 0);
    }

    #[test]
    fn missing_input_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let error = read_input(&Input::File(dir.path().join("nope.s"))).unwrap_err();

        assert_eq!(error.error_type, crate::error::ErrorType::Io);
    }
}
