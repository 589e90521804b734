//! 命令行参数解析

use crate::models::SaveMeta;
use anyhow::{bail, Result};
use std::path::PathBuf;

pub const USAGE: &str = "\
用法:
  gradewise grade <文件> <学生姓名> [学号] [科目]
  gradewise history [关键字]
  gradewise import-rubric <文件>...
  gradewise ingest <文件>...";

/// 程序支持的命令
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// 对一份提交评分并保存到历史
    Grade { file: PathBuf, meta: SaveMeta },
    /// 查看（搜索）评分历史
    History { term: String },
    /// 从文件导入评分标准
    ImportRubric { files: Vec<PathBuf> },
    /// 导入课程材料
    Ingest { files: Vec<PathBuf> },
}

impl Command {
    /// 从命令行参数解析命令（不含程序名）
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let Some(name) = args.next() else {
            bail!("缺少命令\n{}", USAGE);
        };
        let rest: Vec<String> = args.collect();

        match name.as_str() {
            "grade" => {
                let [file, student_name, extra @ ..] = rest.as_slice() else {
                    bail!("grade 需要提交文件和学生姓名\n{}", USAGE);
                };
                let mut meta = SaveMeta {
                    student_name: student_name.clone(),
                    ..SaveMeta::default()
                };
                if let Some(id) = extra.first() {
                    meta.student_id = id.clone();
                }
                if let Some(subject) = extra.get(1) {
                    meta.subject = subject.clone();
                }
                Ok(Command::Grade {
                    file: PathBuf::from(file),
                    meta,
                })
            }
            "history" => Ok(Command::History {
                term: rest.join(" "),
            }),
            "import-rubric" => Ok(Command::ImportRubric {
                files: Self::require_files(&name, rest)?,
            }),
            "ingest" => Ok(Command::Ingest {
                files: Self::require_files(&name, rest)?,
            }),
            other => bail!("未知命令: {}\n{}", other, USAGE),
        }
    }

    fn require_files(name: &str, rest: Vec<String>) -> Result<Vec<PathBuf>> {
        if rest.is_empty() {
            bail!("{} 至少需要一个文件\n{}", name, USAGE);
        }
        Ok(rest.into_iter().map(PathBuf::from).collect())
    }
}
