//! 交互命令解析
//!
//! 把用户输入的一行文本解析成 [`Command`]。用户看到的编号从 1 开始，
//! 解析后统一转换成 0-based 下标。

use chrono::NaiveDate;
use std::path::PathBuf;

use crate::models::request::GenerationRequest;

/// 用户命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 生成新的一页题目；不带参数时沿用上一次的请求
    Generate(Option<GenerationRequest>),
    /// 修改默认主题，下次不带参数的 generate 使用
    Topics(String),
    NextPage,
    PrevPage,
    GoToPage(usize),
    /// 显示当前页
    Show,
    /// 当前页第 N 题加入试卷
    Add(usize),
    /// 撤销当前页第 N 题
    Undo(usize),
    /// 显示已选题目
    Selected,
    Remove(usize),
    Move { from: usize, to: usize },
    Clear,
    ShowAnswers(bool),
    ExamName(String),
    Duration(String),
    Date(String),
    /// 导出到指定目录，缺省使用配置中的目录
    Export(Option<PathBuf>),
    Help,
    Quit,
}

/// 帮助文本
pub const HELP: &str = "\
Commands:
  generate [EASY MEDIUM HARD TOPICS...]  generate a new page of questions
  topics TEXT                            set the topics used by a bare 'generate'
  next | prev | page N                   browse generated pages
  show                                   show the current page
  add N | undo N                         add/undo question N of the current page
  selected                               show the selected questions
  remove N                               remove selected question N
  move FROM TO                           reorder the selected questions
  clear                                  clear all selected questions
  answers on|off                         show correct answers in the paper
  name TEXT | duration MINS | date YYYY-MM-DD
                                         set the exam header
  export [DIR]                           write question_paper.docx and answer_key.docx
  help | quit";

/// 解析一行输入，空行返回 `Ok(None)`
pub fn parse_command(input: &str) -> Result<Option<Command>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let parts: Vec<&str> = input.split_whitespace().collect();
    let command = parts[0].to_lowercase();
    let args = &parts[1..];

    let parsed = match command.as_str() {
        "generate" | "gen" | "g" => parse_generate(args)?,
        "topics" => Command::Topics(rest_text(args, "topics TEXT")?),
        "next" | "n" => no_args(args, Command::NextPage)?,
        "prev" | "p" => no_args(args, Command::PrevPage)?,
        "page" => Command::GoToPage(single_number(args, "page")?),
        "show" | "ls" => no_args(args, Command::Show)?,
        "add" | "a" => Command::Add(single_number(args, "add")?),
        "undo" | "u" => Command::Undo(single_number(args, "undo")?),
        "selected" | "sel" => no_args(args, Command::Selected)?,
        "remove" | "rm" => Command::Remove(single_number(args, "remove")?),
        "move" | "mv" => match args {
            [from, to] => Command::Move {
                from: position(from)?,
                to: position(to)?,
            },
            _ => return Err("Usage: move FROM TO".to_string()),
        },
        "clear" => no_args(args, Command::Clear)?,
        "answers" => match args {
            [flag] => Command::ShowAnswers(parse_flag(flag)?),
            _ => return Err("Usage: answers on|off".to_string()),
        },
        "name" => Command::ExamName(rest_text(args, "name TEXT")?),
        "duration" => Command::Duration(rest_text(args, "duration MINS")?),
        "date" => match args {
            [date] => Command::Date(parse_date(date)?),
            _ => return Err("Usage: date YYYY-MM-DD".to_string()),
        },
        "export" => Command::Export(match args {
            [] => None,
            _ => Some(PathBuf::from(args.join(" "))),
        }),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => {
            return Err(format!(
                "Unknown command: {}. Type 'help' for available commands.",
                command
            ))
        }
    };

    Ok(Some(parsed))
}

fn parse_generate(args: &[&str]) -> Result<Command, String> {
    const USAGE: &str = "Usage: generate [EASY MEDIUM HARD TOPICS...]";
    match args {
        [] => Ok(Command::Generate(None)),
        [easy, medium, hard, topics @ ..] if !topics.is_empty() => {
            let count = |s: &str| {
                s.parse::<u32>()
                    .map_err(|_| format!("Invalid question count: {}. {}", s, USAGE))
            };
            Ok(Command::Generate(Some(GenerationRequest::new(
                topics.join(" "),
                count(*easy)?,
                count(*medium)?,
                count(*hard)?,
            ))))
        }
        _ => Err(USAGE.to_string()),
    }
}

fn no_args(args: &[&str], command: Command) -> Result<Command, String> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(format!("Command takes no arguments: {}", args.join(" ")))
    }
}

fn single_number(args: &[&str], name: &str) -> Result<usize, String> {
    match args {
        [n] => position(n),
        _ => Err(format!("Usage: {} N", name)),
    }
}

/// 1-based 编号转 0-based 下标
fn position(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("Invalid number: {} (numbers start at 1)", s)),
    }
}

fn parse_flag(s: &str) -> Result<bool, String> {
    match s.to_lowercase().as_str() {
        "on" | "yes" | "true" => Ok(true),
        "off" | "no" | "false" => Ok(false),
        _ => Err(format!("Expected on or off, got: {}", s)),
    }
}

fn rest_text(args: &[&str], usage: &str) -> Result<String, String> {
    if args.is_empty() {
        Err(format!("Usage: {}", usage))
    } else {
        Ok(args.join(" "))
    }
}

fn parse_date(s: &str) -> Result<String, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| format!("Invalid date: {} (expected YYYY-MM-DD)", s))
}
