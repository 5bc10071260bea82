/// 展示层模块
///
/// 展示层向用户呈现记录、允许查看和修改，并在结束时给出唯一的"是否修改"结论。
/// 编辑会话只依赖 [`Presenter`] trait，可替换为无界面实现或测试 mock。

use std::io::{BufRead, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::cache::RecordCache;
use crate::utils::EditorError;

/// 对缓存进行程序化修改的回调（例如随机化）
///
/// 使用 `FnOnce` 保证每个会话至多调用一次。
pub type Mutator<'m, T> = Box<dyn FnOnce(&mut RecordCache<'_, T>) -> Result<(), EditorError> + 'm>;

/// 展示层 trait
///
/// # 职责
/// - 呈现 `records`，`labels[i]` 为第 `i` 条记录的显示名称
/// - 若提供了 `mutator`，至多调用一次
/// - 返回值表示是否保留修改；只有当记录确实与会话开始时不同才应返回 `true`
pub trait Presenter<T> {
    fn present(
        &mut self,
        title: &str,
        records: &mut RecordCache<'_, T>,
        labels: &[String],
        mutator: Option<Mutator<'_, T>>,
    ) -> Result<bool, EditorError>;
}

/// 无界面展示层
///
/// 用于命令行批处理和测试：可选地执行回调，然后按配置决定是否保留修改。
#[derive(Debug, Clone, Copy)]
pub struct AutoPresenter {
    /// 是否执行回调
    pub run_mutator: bool,
    /// 用户是否"同意"保留修改
    pub keep_changes: bool,
}

impl AutoPresenter {
    /// 执行回调并保留修改
    pub fn apply() -> Self {
        Self { run_mutator: true, keep_changes: true }
    }

    /// 执行回调但拒绝保留
    pub fn decline() -> Self {
        Self { run_mutator: true, keep_changes: false }
    }
}

impl<T: Clone + PartialEq> Presenter<T> for AutoPresenter {
    fn present(
        &mut self,
        title: &str,
        records: &mut RecordCache<'_, T>,
        _labels: &[String],
        mutator: Option<Mutator<'_, T>>,
    ) -> Result<bool, EditorError> {
        if self.run_mutator {
            if let Some(mutator) = mutator {
                log::debug!("{}: 执行批量修改", title);
                mutator(&mut *records)?;
            }
        }

        Ok(self.keep_changes && records.is_modified())
    }
}

/// 基于行输入的控制台展示层
///
/// 支持的命令：
///
/// ```text
/// list              列出全部记录（* 表示已修改）
/// show <i>          以 JSON 显示第 i 条记录
/// set <i> <json>    用 JSON 替换第 i 条记录
/// random            执行批量修改（至多一次）
/// save              结束并保留修改
/// quit | cancel     结束并丢弃修改
/// ```
///
/// 输入结束（EOF）视为放弃修改。
pub struct ConsolePresenter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePresenter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// 取回输出（测试用）
    pub fn into_output(self) -> W {
        self.output
    }

    fn print_help(&mut self) -> Result<(), EditorError> {
        writeln!(self.output, "commands: list | show <i> | set <i> <json> | random | save | quit")?;
        Ok(())
    }
}

impl<T, R, W> Presenter<T> for ConsolePresenter<R, W>
where
    T: Clone + PartialEq + Serialize + DeserializeOwned,
    R: BufRead,
    W: Write,
{
    fn present(
        &mut self,
        title: &str,
        records: &mut RecordCache<'_, T>,
        labels: &[String],
        mut mutator: Option<Mutator<'_, T>>,
    ) -> Result<bool, EditorError> {
        writeln!(self.output, "== {} ({} records) ==", title, records.len())?;
        self.print_help()?;

        let mut line = String::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(false);
            }

            let mut parts = line.trim().splitn(3, ' ');
            let command = parts.next().unwrap_or_default();
            let index = parts.next().map(str::parse::<usize>);

            match (command, index) {
                ("", _) => {}
                ("list" | "ls", _) => {
                    for i in 0..records.len() {
                        let label = labels.get(i).map(String::as_str).unwrap_or("");
                        let mark = if records.is_dirty(i) { "*" } else { " " };
                        writeln!(self.output, "{}{:>4}  {}", mark, i, label)?;
                    }
                }
                ("show", Some(Ok(i))) if i < records.len() => {
                    let json = serde_json::to_string_pretty(records.get(i)?)?;
                    writeln!(self.output, "{}", json)?;
                }
                ("set", Some(Ok(i))) if i < records.len() => {
                    let text = parts.next().unwrap_or_default();
                    match serde_json::from_str::<T>(text) {
                        Ok(value) => {
                            records.set(i, value)?;
                            writeln!(self.output, "updated {}", i)?;
                        }
                        Err(e) => writeln!(self.output, "invalid record: {}", e)?,
                    }
                }
                ("random", _) => match mutator.take() {
                    Some(mutator) => {
                        mutator(&mut *records)?;
                        writeln!(self.output, "randomized, {} records changed", records.dirty_count())?;
                    }
                    None => writeln!(self.output, "nothing to run")?,
                },
                ("save", _) => return Ok(records.is_modified()),
                ("quit" | "cancel" | "q", _) => return Ok(false),
                ("show" | "set", _) => writeln!(self.output, "expected a record index below {}", records.len())?,
                _ => self.print_help()?,
            }
        }
    }
}
