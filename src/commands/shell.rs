//! # shell 子命令实现
//!
//! 行驱动的交互会话。每条编辑命令都基于当前有效快照构造新的 `SessionState`
//! 并重新计算；计算失败时保留并继续显示上一次的有效结果。
//!
//! ## 命令
//! ```text
//! lattice a b c alpha beta gamma    system NAME|none
//! orient omega chi phi              mode sequential|two-angle
//! range h k l                       target Q TOL | target off
//! viewport x0 x1 y0 y1 | off        positive on|off
//! sort KEY asc|desc | sort off      show   help   quit
//! ```
//!
//! ## 依赖关系
//! - 使用 `cli/shell.rs` 定义的 ShellArgs
//! - 使用 `geometry/session.rs`

use super::common::{engine_config, print_peak_table, resolve_lattice, resolve_orientation};
use crate::cli::common::LatticeInput;
use crate::cli::shell::ShellArgs;
use crate::error::{EwaldError, Result};
use crate::geometry::{FilterOptions, GeometryEngine, Session, SessionState, SortKey, Viewport};
use crate::models::{
    CrystalSystem, HklRange, LatticeParameters, Orientation, QWindow, RotationMode,
};
use crate::utils::output;

use clap::ValueEnum;
use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};

const HELP: &str = "\
  lattice a b c alpha beta gamma   set all six lattice parameters
  system NAME | none               load a crystal-system preset (constrains later edits)
  orient omega chi phi             rotations about X, Y, Z (degrees)
  mode sequential | two-angle      rotation model
  range h k l                      Miller index bounds (or a single n)
  target Q TOL | off               keep peaks with ||G| - Q| <= TOL
  viewport x0 x1 y0 y1 | off       clip the table to a (q_xy, q_z) box
  positive on | off                keep only q_xy > 0 and q_z > 0
  sort KEY asc|desc | off          KEY: qxy qz q h k l
  show                             print the current peak table
  help                             this text
  quit                             leave the shell";

/// 一行输入解析后的命令
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Lattice([f64; 6]),
    System(Option<CrystalSystem>),
    Orient(f64, f64, f64),
    Mode(RotationMode),
    Range(HklRange),
    Target(Option<QWindow>),
    Viewport(Option<Viewport>),
    Positive(bool),
    Sort(Option<(SortKey, bool)>),
    Show,
    Help,
    Quit,
    /// 空行或注释
    Nothing,
}

/// 执行一条命令后的流程控制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

fn numbers<const N: usize>(args: &[&str], usage: &str) -> Result<[f64; N]> {
    if args.len() != N {
        return Err(EwaldError::InvalidArgument(format!("usage: {}", usage)));
    }
    let mut values = [0.0; N];
    for (slot, text) in values.iter_mut().zip(args) {
        *slot = text.parse::<f64>().map_err(|_| {
            EwaldError::InvalidArgument(format!("'{}' is not a number (usage: {})", text, usage))
        })?;
    }
    Ok(values)
}

fn on_off(args: &[&str], usage: &str) -> Result<bool> {
    match args {
        ["on"] => Ok(true),
        ["off"] => Ok(false),
        _ => Err(EwaldError::InvalidArgument(format!("usage: {}", usage))),
    }
}

fn value_enum<T: ValueEnum>(text: &str, what: &str) -> Result<T> {
    T::from_str(text, true)
        .map_err(|_| EwaldError::InvalidArgument(format!("unknown {} '{}'", what, text)))
}

/// 解析一行输入
pub fn parse_command(line: &str) -> Result<ShellCommand> {
    let line = line.split('#').next().unwrap_or("").trim();
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = words.split_first() else {
        return Ok(ShellCommand::Nothing);
    };

    let command = match head.to_lowercase().as_str() {
        "lattice" => ShellCommand::Lattice(numbers::<6>(args, "lattice a b c alpha beta gamma")?),
        "system" => match args {
            ["none"] => ShellCommand::System(None),
            [name] => ShellCommand::System(Some(value_enum(name, "crystal system")?)),
            _ => return Err(EwaldError::InvalidArgument("usage: system NAME | none".into())),
        },
        "orient" => {
            let [omega, chi, phi] = numbers::<3>(args, "orient omega chi phi")?;
            ShellCommand::Orient(omega, chi, phi)
        }
        "mode" => match args {
            [name] => ShellCommand::Mode(value_enum(name, "rotation mode")?),
            _ => {
                return Err(EwaldError::InvalidArgument(
                    "usage: mode sequential | two-angle".into(),
                ))
            }
        },
        "range" => ShellCommand::Range(HklRange::parse(&args.join(","))?),
        "target" => match args {
            ["off"] => ShellCommand::Target(None),
            _ => {
                let [q, tol] = numbers::<2>(args, "target Q TOL | target off")?;
                ShellCommand::Target(Some(QWindow::new(q, tol)?))
            }
        },
        "viewport" => match args {
            ["off"] => ShellCommand::Viewport(None),
            _ => {
                let [x0, x1, y0, y1] = numbers::<4>(args, "viewport x0 x1 y0 y1 | viewport off")?;
                ShellCommand::Viewport(Some(Viewport::new(x0, x1, y0, y1)?))
            }
        },
        "positive" => ShellCommand::Positive(on_off(args, "positive on|off")?),
        "sort" => match args {
            ["off"] => ShellCommand::Sort(None),
            [key] => ShellCommand::Sort(Some((value_enum(key, "sort key")?, true))),
            [key, "asc"] => ShellCommand::Sort(Some((value_enum(key, "sort key")?, true))),
            [key, "desc"] => ShellCommand::Sort(Some((value_enum(key, "sort key")?, false))),
            _ => {
                return Err(EwaldError::InvalidArgument(
                    "usage: sort KEY asc|desc | sort off".into(),
                ))
            }
        },
        "show" => ShellCommand::Show,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => {
            return Err(EwaldError::InvalidArgument(format!(
                "unknown command '{}' (try 'help')",
                other
            )))
        }
    };
    Ok(command)
}

/// 交互会话：会话状态 + 当前晶系约束
pub struct Shell {
    session: Session,
    system: Option<CrystalSystem>,
}

impl Shell {
    /// 以初始快照启动；初始快照必须可计算
    pub fn new(engine: GeometryEngine, initial: SessionState) -> Result<Self> {
        let mut session = Session::new(engine, FilterOptions::default());
        session.apply(initial)?;
        Ok(Shell {
            session,
            system: None,
        })
    }

    pub fn with_system(mut self, system: Option<CrystalSystem>) -> Self {
        self.system = system;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn current(&self) -> Result<SessionState> {
        self.session
            .state()
            .copied()
            .ok_or_else(|| EwaldError::Other("session has no valid state".into()))
    }

    /// 提交新快照；失败时会话保持不变
    fn submit(&mut self, next: SessionState) -> Result<()> {
        let set = self.session.apply(next)?;
        output::print_debug(&format!("recomputed: {} peaks", set.peaks.len()));
        self.report();
        Ok(())
    }

    fn report(&self) {
        if let (Some(set), Some(table)) = (self.session.peak_set(), self.session.table()) {
            output::print_info(&format!(
                "{} peaks, {} shown",
                set.peaks.len(),
                table.len()
            ));
        }
    }

    /// 执行一条已解析的命令
    pub fn execute(&mut self, command: ShellCommand) -> Result<Flow> {
        let current = self.current()?;
        let mut filter = *self.session.filter();

        match command {
            ShellCommand::Lattice([a, b, c, alpha, beta, gamma]) => {
                let raw = LatticeParameters {
                    a,
                    b,
                    c,
                    alpha,
                    beta,
                    gamma,
                };
                let lattice = match self.system {
                    Some(system) => {
                        let constrained = system.constrain(raw);
                        if constrained != raw {
                            output::print_warning(&format!(
                                "{} constraints applied: {}",
                                system, constrained
                            ));
                        }
                        constrained
                    }
                    None => raw,
                };
                lattice.validate()?;
                self.submit(current.with_lattice(lattice))?;
            }
            ShellCommand::System(system) => {
                if let Some(system) = system {
                    self.submit(current.with_lattice(system.preset()))?;
                    output::print_info(&format!("{} preset: {}", system, system.preset()));
                }
                self.system = system;
            }
            ShellCommand::Orient(omega, chi, phi) => {
                let orientation = Orientation::new(omega, chi, phi)?;
                self.submit(current.with_orientation(orientation))?;
            }
            ShellCommand::Mode(mode) => self.submit(current.with_mode(mode))?,
            ShellCommand::Range(range) => self.submit(current.with_range(range))?,
            ShellCommand::Target(window) => self.submit(current.with_window(window))?,
            ShellCommand::Viewport(viewport) => {
                filter.viewport = viewport;
                self.session.set_filter(filter);
                self.report();
            }
            ShellCommand::Positive(positive) => {
                filter.positive_only = positive;
                self.session.set_filter(filter);
                self.report();
            }
            ShellCommand::Sort(sort) => {
                filter.sort_key = sort.map(|(key, _)| key);
                filter.ascending = sort.map_or(true, |(_, asc)| asc);
                self.session.set_filter(filter);
            }
            ShellCommand::Show => self.show(),
            ShellCommand::Help => println!("{}", HELP),
            ShellCommand::Quit => return Ok(Flow::Quit),
            ShellCommand::Nothing => {}
        }

        Ok(Flow::Continue)
    }

    /// 解析并执行一行；错误打印后继续
    pub fn execute_line(&mut self, line: &str) -> Flow {
        match parse_command(line).and_then(|cmd| self.execute(cmd)) {
            Ok(flow) => flow,
            Err(e) => {
                output::print_error(&e.to_string());
                output::print_warning("Keeping the last valid peak set");
                Flow::Continue
            }
        }
    }

    fn show(&self) {
        if let Some(state) = self.session.state() {
            output::print_field("Lattice", &state.lattice.to_string());
            output::print_field(
                "Orientation",
                &format!("{} ({})", state.orientation, state.mode),
            );
            output::print_field("HKL range", &state.range.to_string());
            if let Some(system) = self.system {
                output::print_field("System", &system.to_string());
            }
        }
        if let Some(table) = self.session.table() {
            print_peak_table(&table, 0);
        }
    }
}

/// 执行 shell 命令
pub fn execute(args: ShellArgs) -> Result<()> {
    let lattice_input = if args.lattice.system.is_none()
        && [
            args.lattice.a,
            args.lattice.b,
            args.lattice.c,
            args.lattice.alpha,
            args.lattice.beta,
            args.lattice.gamma,
        ]
        .iter()
        .all(Option::is_none)
    {
        LatticeInput {
            system: Some(CrystalSystem::Cubic),
            ..args.lattice.clone()
        }
    } else {
        args.lattice.clone()
    };

    let (lattice, warnings) = resolve_lattice(&lattice_input)?;
    for warning in &warnings {
        output::print_warning(warning);
    }

    let initial = SessionState::new(lattice)
        .with_orientation(resolve_orientation(&args.orientation)?)
        .with_mode(args.orientation.mode);
    let engine = GeometryEngine::new(engine_config(&args.engine)?);
    let mut shell = Shell::new(engine, initial)?.with_system(lattice_input.system);

    match &args.script {
        Some(path) => {
            let file = File::open(path).map_err(|e| EwaldError::FileReadError {
                path: path.display().to_string(),
                source: e,
            })?;
            output::print_info(&format!("Running script '{}'", path.display()));
            run_lines(&mut shell, BufReader::new(file), false)
        }
        None => {
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            if interactive {
                output::print_header("Ewald interactive session (type 'help')");
            }
            run_lines(&mut shell, stdin.lock(), interactive)
        }
    }
}

fn run_lines<R: BufRead>(shell: &mut Shell, reader: R, prompt: bool) -> Result<()> {
    let read_err = |e: io::Error| EwaldError::FileReadError {
        path: "<input>".to_string(),
        source: e,
    };

    if prompt {
        print!("ewald> ");
        io::stdout().flush().map_err(read_err)?;
    }
    for line in reader.lines() {
        let line = line.map_err(read_err)?;
        if shell.execute_line(&line) == Flow::Quit {
            return Ok(());
        }
        if prompt {
            print!("ewald> ");
            io::stdout().flush().map_err(read_err)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic_shell() -> Shell {
        let lattice = LatticeParameters::new(5.0, 5.0, 5.0, 90.0, 90.0, 90.0).unwrap();
        Shell::new(GeometryEngine::default(), SessionState::new(lattice)).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_command("lattice 5 5 5 90 90 90").unwrap(),
            ShellCommand::Lattice([5.0, 5.0, 5.0, 90.0, 90.0, 90.0])
        );
        assert_eq!(
            parse_command("  orient 10 -5 0  ").unwrap(),
            ShellCommand::Orient(10.0, -5.0, 0.0)
        );
        assert_eq!(
            parse_command("range 2 2 1").unwrap(),
            ShellCommand::Range(HklRange::new(2, 2, 1).unwrap())
        );
        assert_eq!(
            parse_command("sort qz desc").unwrap(),
            ShellCommand::Sort(Some((SortKey::Qz, false)))
        );
        assert_eq!(
            parse_command("mode two-angle").unwrap(),
            ShellCommand::Mode(RotationMode::TwoAngle)
        );
        assert_eq!(
            parse_command("system Hexagonal").unwrap(),
            ShellCommand::System(Some(CrystalSystem::Hexagonal))
        );
        assert_eq!(parse_command("# comment").unwrap(), ShellCommand::Nothing);
        assert_eq!(parse_command("").unwrap(), ShellCommand::Nothing);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("lattice 5 5 5").is_err());
        assert!(parse_command("orient a b c").is_err());
        assert!(parse_command("positive maybe").is_err());
        assert!(parse_command("range -1 0 0").is_err());
        assert!(parse_command("target 1.0 -0.1").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[test]
    fn test_edit_recomputes() {
        let mut shell = cubic_shell();
        assert_eq!(shell.session().table().unwrap().len(), 26);

        assert_eq!(shell.execute_line("range 2"), Flow::Continue);
        assert_eq!(shell.session().table().unwrap().len(), 124);

        shell.execute_line("positive on");
        assert_eq!(shell.session().table().unwrap().len(), 48);
    }

    #[test]
    fn test_failed_edit_keeps_last_valid_state() {
        let mut shell = cubic_shell();
        shell.execute_line("orient 90 0 0");

        // γ = 180° 为退化晶格
        assert_eq!(shell.execute_line("lattice 5 5 5 90 90 180"), Flow::Continue);
        let state = shell.session().state().unwrap();
        assert_eq!(state.lattice.gamma, 90.0);
        assert_eq!(state.orientation.omega, 90.0);
        assert_eq!(shell.session().table().unwrap().len(), 26);
    }

    #[test]
    fn test_system_constrains_lattice_edits() {
        let mut shell = cubic_shell();
        shell.execute_line("system tetragonal");
        shell.execute_line("lattice 4 7 6 80 90 90");

        let lattice = shell.session().state().unwrap().lattice;
        assert_eq!((lattice.a, lattice.b, lattice.c), (4.0, 4.0, 6.0));
        assert_eq!(lattice.alpha, 90.0);
    }

    #[test]
    fn test_target_window_and_quit() {
        let mut shell = cubic_shell();
        let q100 = 2.0 * std::f64::consts::PI / 5.0;
        shell.execute_line(&format!("target {} 0.001", q100));
        assert_eq!(shell.session().table().unwrap().len(), 6);

        shell.execute_line("target off");
        assert_eq!(shell.session().table().unwrap().len(), 26);

        assert_eq!(shell.execute_line("quit"), Flow::Quit);
    }

    #[test]
    fn test_run_lines_stops_at_quit() {
        let mut shell = cubic_shell();
        let script = "range 2\nquit\nrange 3\n";
        run_lines(&mut shell, script.as_bytes(), false).unwrap();
        assert_eq!(shell.session().state().unwrap().range, HklRange::uniform(2).unwrap());
    }
}
