//! PPTX package writer.

use crate::parts::{self, DocumentProperties};
use crate::templates::{self, part};
use deck_core::{Deck, Error, Result};
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Serializes a [`Deck`] into a PowerPoint (Office Open XML) package.
#[derive(Debug, Clone, Default)]
pub struct PptxWriter {
    properties: DocumentProperties,
}

impl PptxWriter {
    /// Create a writer with empty document metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document title stored in `docProps/core.xml`.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.properties.title = title.into();
        self
    }

    /// Set the document author.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.properties.creator = creator.into();
        self
    }

    /// Set the application name recorded in the package metadata.
    pub fn with_application(mut self, application: impl Into<String>) -> Self {
        self.properties.application = application.into();
        self
    }

    /// Write the deck to `writer` and hand the writer back once the archive
    /// is finished.
    pub fn write<W: Write + Seek>(&self, deck: &Deck, writer: W) -> Result<W> {
        let slide_count = deck.slides.len();
        let mut package = Package::new(writer);

        package.add(part::CONTENT_TYPES, &parts::content_types_xml(slide_count)?)?;
        package.add(
            part::ROOT_RELS,
            &parts::relationships_xml(&parts::root_relationships())?,
        )?;
        package.add(
            part::APP_PROPERTIES,
            &parts::app_properties_xml(&self.properties, slide_count)?,
        )?;
        package.add(
            part::CORE_PROPERTIES,
            &parts::core_properties_xml(&self.properties)?,
        )?;
        package.add(part::PRESENTATION, &parts::presentation_xml(deck)?)?;
        package.add(
            part::PRESENTATION_RELS,
            &parts::relationships_xml(&parts::presentation_relationships(slide_count))?,
        )?;

        let slide_rels = parts::relationships_xml(&parts::slide_relationships())?;
        for (idx, slide) in deck.slides.iter().enumerate() {
            let number = idx + 1;
            let xml = parts::slide_xml(slide)
                .map_err(|e| Error::InvalidDeck(format!("slide {}: {}", number, e)))?;
            package.add(&part::slide(number), &xml)?;
            package.add(&part::slide_rels(number), &slide_rels)?;
            log::debug!(
                "Wrote slide {} ({} text boxes)",
                number,
                slide.text_boxes.len()
            );
        }

        package.add(part::SLIDE_MASTER, templates::SLIDE_MASTER_XML)?;
        package.add(
            part::SLIDE_MASTER_RELS,
            &parts::relationships_xml(&parts::slide_master_relationships())?,
        )?;
        package.add(part::SLIDE_LAYOUT, templates::SLIDE_LAYOUT_XML)?;
        package.add(
            part::SLIDE_LAYOUT_RELS,
            &parts::relationships_xml(&parts::slide_layout_relationships())?,
        )?;
        package.add(part::THEME, templates::THEME_XML)?;
        package.add(part::PRES_PROPS, templates::PRES_PROPS_XML)?;
        package.add(part::VIEW_PROPS, templates::VIEW_PROPS_XML)?;
        package.add(part::TABLE_STYLES, templates::TABLE_STYLES_XML)?;

        package.finish()
    }

    /// Write the deck to a file, replacing it if it exists.
    pub fn save(&self, deck: &Deck, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = self.write(deck, BufWriter::new(file))?;
        writer.flush()?;

        log::debug!("Saved {} slides to {}", deck.slides.len(), path.display());
        Ok(())
    }
}

/// A ZIP archive being filled with package parts.
struct Package<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: FileOptions,
}

impl<W: Write + Seek> Package<W> {
    fn new(writer: W) -> Self {
        // Fixed entry timestamps keep repeated runs byte-identical.
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());
        Self {
            zip: ZipWriter::new(writer),
            options,
        }
    }

    fn add(&mut self, name: &str, content: &str) -> Result<()> {
        self.zip
            .start_file(name, self.options)
            .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", name, e)))?;
        self.zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn finish(mut self) -> Result<W> {
        self.zip
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PptxParser;
    use deck_core::color::SVTR_BLUE;
    use deck_core::{chatsvtr_deck, Length, Paragraph, Slide, TextBox, SLIDE_COUNT};
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn write_to_memory(deck: &Deck) -> Vec<u8> {
        PptxWriter::new()
            .with_title("ChatSVTR 功能介绍")
            .write(deck, Cursor::new(Vec::new()))
            .unwrap()
            .into_inner()
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut content = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    #[test]
    fn test_package_contains_required_parts() {
        let bytes = write_to_memory(&chatsvtr_deck());
        let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();

        for required in [
            part::CONTENT_TYPES,
            part::ROOT_RELS,
            part::PRESENTATION,
            part::PRESENTATION_RELS,
            part::SLIDE_MASTER,
            part::SLIDE_LAYOUT,
            part::THEME,
            "ppt/slides/slide1.xml",
            "ppt/slides/slide10.xml",
            "ppt/slides/_rels/slide10.xml.rels",
        ] {
            assert!(names.contains(&required), "missing {}", required);
        }
        assert!(!names.contains(&"ppt/slides/slide11.xml"));
    }

    #[test]
    fn test_written_deck_reads_back() {
        let bytes = write_to_memory(&chatsvtr_deck());
        let deck = PptxParser::new()
            .parse(Cursor::new(bytes), "ChatSVTR-功能介绍.pptx")
            .unwrap();

        assert_eq!(deck.slides.len(), SLIDE_COUNT);
        assert_eq!(deck.slide_width, Some(Length::inches(10.0)));
        assert_eq!(deck.slide_height, Some(Length::inches(7.5)));

        for (idx, slide) in deck.slides.iter().enumerate() {
            assert_eq!(slide.number, idx + 1);
            if idx == 0 || idx == 9 {
                assert_eq!(slide.background, Some(SVTR_BLUE));
            } else {
                assert_eq!(slide.background, None, "slide {}", idx + 1);
            }
        }

        assert_eq!(
            deck.slides[0].non_empty_lines(),
            vec![
                "ChatSVTR",
                "SVTR.AI 全球AI创投平台 - 产品功能介绍",
                "硅谷科技评论 | 2025"
            ]
        );
        assert_eq!(
            deck.slides[1].non_empty_lines(),
            vec![
                "项目概述",
                "• 定位: 全球AI创投行业的统一平台",
                "• 核心价值: 连接AI创业者、投资人与行业专家",
                "• 技术特点: 混合RAG架构 + Cloudflare边缘计算",
                "• 数据来源: 飞书知识库 252个节点完整内容",
                "• 性能优化: 37.9KB资源优化 | Lighthouse 90+分",
            ]
        );
        assert_eq!(
            deck.slides[2].non_empty_lines(),
            vec![
                "核心技术栈",
                "前端技术",
                "  • 原生 HTML5/CSS3/JavaScript",
                "  • ES2022 语法标准",
                "  • WebP 图片优化",
                "  • Gzip 压缩",
                "后端技术",
                "  • Cloudflare Workers",
                "  • Cloudflare KV 存储",
                "  • Cloudflare Vectorize",
                "  • OpenAI GPT + Workers AI",
            ]
        );
        assert_eq!(
            deck.slides[3].non_empty_lines(),
            vec![
                "AI & RAG 智能问答系统",
                "🔹 混合RAG架构",
                "   结合向量搜索与关键词检索",
                "🔹 数据源",
                "   飞书知识库 252 节点完整内容",
                "🔹 AI模型",
                "   OpenAI GPT + Cloudflare Workers AI",
                "🔹 主服务",
                "   functions/lib/hybrid-rag-service.ts",
                "🔹 飞书集成",
                "   App ID: cli_a8e2014cbe7d9013",
                "🔹 智能同步",
                "   scripts/smart-sync-strategy.js",
            ]
        );
        assert_eq!(
            deck.slides[4].non_empty_lines(),
            vec![
                "核心功能模块",
                "💬 智能聊天系统 - 基于RAG的AI问答",
                "📊 融资数据可视化 - 阶段、金额筛选",
                "🔍 智能建议系统 - 上下文相关推荐",
                "📈 每日交易精选 - 自动同步展示",
                "🌐 飞书知识库集成 - 252节点内容",
                "⚡ 实时数据同步 - 智能同步策略",
                "🎯 标签过滤系统 - 多维度筛选",
                "📱 响应式设计 - 完美移动体验",
            ]
        );
        assert_eq!(
            deck.slides[5].non_empty_lines(),
            vec![
                "开发工作流",
                "开发 & 测试",
                "  • npm run dev → 开发服务器",
                "  • npm run preview → 预览",
                "  • npm run test → 单元测试",
                "  • npm run test:e2e → E2E测试",
                "  • npm run lint → 代码检查",
                "构建 & 部署",
                "  • npm run build → TS编译",
                "  • npm run optimize:all → 资源优化",
                "  • npm run sync → 飞书同步",
                "  • npm run deploy:cloudflare → 部署",
                "  • npm run backup → 备份",
            ]
        );
        assert_eq!(
            deck.slides[6].non_empty_lines(),
            vec![
                "性能优化成果",
                "📦 资源优化",
                "   37.9KB 总体积减少",
                "⚡ 性能评分",
                "   Lighthouse 90+ 分",
                "🖼️ 图片优化",
                "   WebP 转换 + Fallback",
                "🗜️ 压缩策略",
                "   Terser/CleanCSS + Gzip",
                "🚀 边缘计算",
                "   Cloudflare 全球加速",
                "💾 缓存优化",
                "   KV存储 + 智能缓存",
            ]
        );
        assert_eq!(
            deck.slides[7].non_empty_lines(),
            vec![
                "开发体验创新",
                "🇨🇳 中文命令",
                "   npm run 预览 | npm run 推送 | npm run 测试",
                "🔄 智能同步",
                "   自动数据质量检查 + 完整性验证",
                "✅ 完整测试",
                "   Jest单元测试 + Playwright E2E",
                "💾 自动备份",
                "   npm run backup / rollback",
                "📊 质量监控",
                "   代码质量优化 + 性能监控",
                "🤖 MCP集成",
                "   多服务协同 (Feishu/GitHub/SQLite)",
            ]
        );
        assert_eq!(
            deck.slides[8].non_empty_lines(),
            vec![
                "技术亮点与创新",
                "🎯 混合技术栈：前端原生JS + 后端Serverless",
                "🔍 双文件系统：优化版本与源文件并存",
                "📡 实时数据流：飞书 → KV → 前端展示",
                "🧠 智能RAG：向量检索 + 语义理解",
                "⚙️ 自动化流程：测试/构建/部署一体化",
                "🔐 安全机制：API鉴权 + 数据加密",
            ]
        );
        assert_eq!(
            deck.slides[9].non_empty_lines(),
            vec![
                "感谢观看",
                "🌐 官网：https://svtr.ai",
                "💻 GitHub：github.com/capmapt/chatsvtr"
            ]
        );
    }

    #[test]
    fn test_reads_back_every_paragraph_in_order() {
        let source = chatsvtr_deck();
        let bytes = write_to_memory(&source);
        let deck = PptxParser::new().parse(Cursor::new(bytes), "deck.pptx").unwrap();

        for (written, read) in source.slides.iter().zip(&deck.slides) {
            let expected: Vec<&str> = written
                .text_boxes
                .iter()
                .flat_map(|b| b.paragraphs.iter())
                .map(|p| p.text.as_str())
                .collect();
            let actual: Vec<&str> = read.lines.iter().map(|l| l.text.as_str()).collect();
            assert_eq!(actual, expected, "slide {}", read.number);
        }
    }

    #[test]
    fn test_output_is_reproducible() {
        let first = write_to_memory(&chatsvtr_deck());
        let second = write_to_memory(&chatsvtr_deck());
        assert_eq!(first, second);
    }

    #[test]
    fn test_metadata_parts() {
        let bytes = write_to_memory(&chatsvtr_deck());

        let core = read_part(&bytes, part::CORE_PROPERTIES);
        assert!(core.contains("<dc:title>ChatSVTR 功能介绍</dc:title>"));

        let app = read_part(&bytes, part::APP_PROPERTIES);
        assert!(app.contains("<Slides>10</Slides>"));

        let rels = read_part(&bytes, "ppt/slides/_rels/slide3.xml.rels");
        assert!(rels.contains(r#"Target="../slideLayouts/slideLayout1.xml""#));
    }

    #[test]
    fn test_invalid_slide_names_its_number() {
        let mut deck = Deck::new(Length::inches(10.0), Length::inches(7.5));
        deck.add_slide(Slide::new());
        let mut broken = Slide::new();
        broken.add_text_box(TextBox::new(
            Length::inches(1.0),
            Length::inches(1.0),
            Length::inches(1.0),
            Length::inches(1.0),
        ));
        deck.add_slide(broken);

        let err = PptxWriter::new()
            .write(&deck, Cursor::new(Vec::new()))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDeck(ref msg) if msg.starts_with("slide 2")));
    }

    #[test]
    fn test_save_creates_file() {
        let dir = std::env::temp_dir().join(format!("deck-pptx-save-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("单页.pptx");

        let mut deck = Deck::new(Length::inches(10.0), Length::inches(7.5));
        let mut slide = Slide::new();
        slide.add_text_box(
            TextBox::new(
                Length::inches(0.5),
                Length::inches(0.5),
                Length::inches(9.0),
                Length::inches(0.8),
            )
            .with_paragraph(Paragraph::new("项目概述").size(44.0).bold()),
        );
        deck.add_slide(slide);

        PptxWriter::new().save(&deck, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK\x03\x04"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
