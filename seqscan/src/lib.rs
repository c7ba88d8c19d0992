//! # seqscan
//!
//! 在 FASTA 文件中查找目标序列的精确命中，并用 NCBI BLAST 注释命中下游的上游区域。
//!
//! 两条独立的批处理流程，通过 CSV 文件衔接：
//!
//! - **match**：扫描每条记录的正链与反向互补链，输出
//!   `ID,POSITION,STRAND,UPST LENGTH,UPSTREAM`
//! - **annotate**：读取上述 CSV，对每个非空的上游序列提交一次远程 blastn 搜索，
//!   追加最佳命中的描述、比对长度与一致性百分比
//!
//! ## 快速示例
//!
//! ```rust
//! use seqscan::io::fasta::FastaRecord;
//! use seqscan::matcher::{find_matches, Strand};
//!
//! let records = vec![FastaRecord {
//!     id: "seq1".to_string(),
//!     desc: None,
//!     seq: b"TTGAATTCAA".to_vec(),
//! }];
//! let hits = find_matches(&records, b"GAATTC", 200);
//! assert_eq!(hits.len(), 2);
//! assert_eq!(hits[0].strand, Strand::Forward);
//! assert_eq!(hits[0].position, 2);
//! ```
//!
//! ## 模块说明
//!
//! - [`io`] — FASTA 解析与无引号 CSV 读写
//! - [`matcher`] — 正链 / 反向互补精确匹配与上游区域截取
//! - [`annotator`] — CSV 行注释
//! - [`blast`] — 相似性搜索接口、NCBI URL API 客户端、BLAST XML 解析
//! - [`targets`] — 目标序列表
//! - [`config`] — `seqscan.toml` 配置
//! - [`overwrite`] — 覆盖输出文件前的确认
//! - [`pipeline`] — 文件级流程
//! - [`util`] — 反向互补等 DNA 工具函数

pub mod annotator;
pub mod blast;
pub mod config;
pub mod io;
pub mod matcher;
pub mod overwrite;
pub mod pipeline;
pub mod targets;
pub mod util;
