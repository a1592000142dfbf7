//! The ChatSVTR feature presentation.
//!
//! Ten slides, built in a fixed order from literal text. Boxes whose first
//! paragraph is [`Paragraph::empty`] keep the blank line a fresh text frame
//! starts with, so the body text sits one line below the box top.

use crate::color::{PALE_BLUE, SVTR_BLUE, SVTR_DARK, WHITE};
use crate::types::{Alignment, Deck, Paragraph, Slide, TextBox};
use crate::units::Length;

/// File name written to the working directory.
pub const OUTPUT_FILENAME: &str = "ChatSVTR-功能介绍.pptx";

/// Number of slides in the deck.
pub const SLIDE_COUNT: usize = 10;

/// Shorthand for a text box positioned in inches.
fn text_box(left: f64, top: f64, width: f64, height: f64) -> TextBox {
    TextBox::new(
        Length::inches(left),
        Length::inches(top),
        Length::inches(width),
        Length::inches(height),
    )
}

/// Heading shared by the content slides.
fn heading(title: &str) -> TextBox {
    text_box(0.5, 0.5, 9.0, 0.8).with_paragraph(
        Paragraph::new(title)
            .size(44.0)
            .bold()
            .color(SVTR_DARK),
    )
}

/// Build the complete deck.
pub fn chatsvtr_deck() -> Deck {
    let mut deck = Deck::new(Length::inches(10.0), Length::inches(7.5));

    deck.add_slide(cover());
    deck.add_slide(overview());
    deck.add_slide(tech_stack());
    deck.add_slide(rag_system());
    deck.add_slide(core_features());
    deck.add_slide(dev_workflow());
    deck.add_slide(performance());
    deck.add_slide(developer_experience());
    deck.add_slide(highlights());
    deck.add_slide(thanks());

    log::debug!("Built deck with {} slides", deck.slides.len());
    deck
}

fn cover() -> Slide {
    let mut slide = Slide::new().with_background(SVTR_BLUE);

    slide.add_text_box(
        text_box(1.0, 2.5, 8.0, 1.0).with_paragraph(
            Paragraph::new("ChatSVTR")
                .size(72.0)
                .bold()
                .color(WHITE)
                .align(Alignment::Center),
        ),
    );

    slide.add_text_box(
        text_box(1.0, 3.8, 8.0, 0.8).with_paragraph(
            Paragraph::new("SVTR.AI 全球AI创投平台 - 产品功能介绍")
                .size(28.0)
                .color(WHITE)
                .align(Alignment::Center),
        ),
    );

    slide.add_text_box(
        text_box(1.0, 6.5, 8.0, 0.5).with_paragraph(
            Paragraph::new("硅谷科技评论 | 2025")
                .size(16.0)
                .color(PALE_BLUE)
                .align(Alignment::Center),
        ),
    );

    slide
}

fn overview() -> Slide {
    let mut slide = Slide::new();
    slide.add_text_box(heading("项目概述"));

    let items = [
        ("定位", "全球AI创投行业的统一平台"),
        ("核心价值", "连接AI创业者、投资人与行业专家"),
        ("技术特点", "混合RAG架构 + Cloudflare边缘计算"),
        ("数据来源", "飞书知识库 252个节点完整内容"),
        ("性能优化", "37.9KB资源优化 | Lighthouse 90+分"),
    ];

    let mut content = text_box(0.8, 1.8, 8.4, 4.5)
        .word_wrap(true)
        .with_paragraph(Paragraph::empty());
    for (label, desc) in items {
        content.add_paragraph(
            Paragraph::new(format!("• {}: {}", label, desc))
                .size(20.0)
                .color(SVTR_DARK)
                .space_after(12.0),
        );
    }
    slide.add_text_box(content);

    slide
}

/// A column with a blue sub-heading and an indented bullet list.
fn bullet_column(
    left: f64,
    width: f64,
    height: f64,
    title: &str,
    items: &[&str],
    size: f64,
    gap: f64,
) -> TextBox {
    let mut column = text_box(left, 1.8, width, height)
        .word_wrap(true)
        .with_paragraph(Paragraph::new(title).size(24.0).bold().color(SVTR_BLUE));
    for item in items {
        column.add_paragraph(
            Paragraph::new(format!("  • {}", item))
                .size(size)
                .space_after(gap),
        );
    }
    column
}

fn tech_stack() -> Slide {
    let mut slide = Slide::new();
    slide.add_text_box(heading("核心技术栈"));

    let frontend = [
        "原生 HTML5/CSS3/JavaScript",
        "ES2022 语法标准",
        "WebP 图片优化",
        "Gzip 压缩",
    ];
    slide.add_text_box(bullet_column(0.8, 4.0, 4.0, "前端技术", &frontend, 18.0, 8.0));

    let backend = [
        "Cloudflare Workers",
        "Cloudflare KV 存储",
        "Cloudflare Vectorize",
        "OpenAI GPT + Workers AI",
    ];
    slide.add_text_box(bullet_column(5.2, 4.0, 4.0, "后端技术", &backend, 18.0, 8.0));

    slide
}

/// Alternating bold blue labels and indented descriptions.
///
/// `label_gap` and `detail_gap` are the space after each label and each
/// description, in points.
fn labelled_pairs(
    mut content: TextBox,
    pairs: &[(String, &str)],
    label_size: f64,
    label_gap: f64,
    detail_size: f64,
    detail_gap: f64,
) -> TextBox {
    for (label, detail) in pairs {
        content.add_paragraph(
            Paragraph::new(label.as_str())
                .size(label_size)
                .bold()
                .color(SVTR_BLUE)
                .space_after(label_gap),
        );
        content.add_paragraph(
            Paragraph::new(format!("   {}", detail))
                .size(detail_size)
                .space_after(detail_gap),
        );
    }
    content
}

fn rag_system() -> Slide {
    let mut slide = Slide::new();
    slide.add_text_box(heading("AI & RAG 智能问答系统"));

    let features = [
        ("混合RAG架构", "结合向量搜索与关键词检索"),
        ("数据源", "飞书知识库 252 节点完整内容"),
        ("AI模型", "OpenAI GPT + Cloudflare Workers AI"),
        ("主服务", "functions/lib/hybrid-rag-service.ts"),
        ("飞书集成", "App ID: cli_a8e2014cbe7d9013"),
        ("智能同步", "scripts/smart-sync-strategy.js"),
    ];
    let pairs: Vec<(String, &str)> = features
        .iter()
        .map(|(label, desc)| (format!("🔹 {}", label), *desc))
        .collect();

    let content = text_box(0.8, 1.8, 8.4, 5.0)
        .word_wrap(true)
        .with_paragraph(Paragraph::empty());
    slide.add_text_box(labelled_pairs(content, &pairs, 22.0, 6.0, 18.0, 14.0));

    slide
}

/// A wrapped box of single-line entries at one size and spacing.
fn plain_list(content: TextBox, lines: &[&str], size: f64, gap: f64) -> TextBox {
    let mut content = content.word_wrap(true).with_paragraph(Paragraph::empty());
    for line in lines {
        content.add_paragraph(Paragraph::new(*line).size(size).space_after(gap));
    }
    content
}

fn core_features() -> Slide {
    let mut slide = Slide::new();
    slide.add_text_box(heading("核心功能模块"));

    let features = [
        "💬 智能聊天系统 - 基于RAG的AI问答",
        "📊 融资数据可视化 - 阶段、金额筛选",
        "🔍 智能建议系统 - 上下文相关推荐",
        "📈 每日交易精选 - 自动同步展示",
        "🌐 飞书知识库集成 - 252节点内容",
        "⚡ 实时数据同步 - 智能同步策略",
        "🎯 标签过滤系统 - 多维度筛选",
        "📱 响应式设计 - 完美移动体验",
    ];
    slide.add_text_box(plain_list(text_box(0.8, 1.8, 8.4, 5.0), &features, 22.0, 16.0));

    slide
}

fn dev_workflow() -> Slide {
    let mut slide = Slide::new();
    slide.add_text_box(heading("开发工作流"));

    let dev_cmds = [
        "npm run dev → 开发服务器",
        "npm run preview → 预览",
        "npm run test → 单元测试",
        "npm run test:e2e → E2E测试",
        "npm run lint → 代码检查",
    ];
    slide.add_text_box(bullet_column(0.8, 4.2, 4.5, "开发 & 测试", &dev_cmds, 16.0, 10.0));

    let build_cmds = [
        "npm run build → TS编译",
        "npm run optimize:all → 资源优化",
        "npm run sync → 飞书同步",
        "npm run deploy:cloudflare → 部署",
        "npm run backup → 备份",
    ];
    slide.add_text_box(bullet_column(5.2, 4.2, 4.5, "构建 & 部署", &build_cmds, 16.0, 10.0));

    slide
}

fn performance() -> Slide {
    let mut slide = Slide::new();
    slide.add_text_box(heading("性能优化成果"));

    let metrics = [
        ("📦 资源优化", "37.9KB 总体积减少"),
        ("⚡ 性能评分", "Lighthouse 90+ 分"),
        ("🖼️ 图片优化", "WebP 转换 + Fallback"),
        ("🗜️ 压缩策略", "Terser/CleanCSS + Gzip"),
        ("🚀 边缘计算", "Cloudflare 全球加速"),
        ("💾 缓存优化", "KV存储 + 智能缓存"),
    ];
    let pairs: Vec<(String, &str)> = metrics
        .iter()
        .map(|(label, value)| (label.to_string(), *value))
        .collect();

    let content = text_box(1.5, 2.0, 7.0, 4.0)
        .word_wrap(true)
        .with_paragraph(Paragraph::empty());
    slide.add_text_box(labelled_pairs(content, &pairs, 24.0, 4.0, 20.0, 18.0));

    slide
}

fn developer_experience() -> Slide {
    let mut slide = Slide::new();
    slide.add_text_box(heading("开发体验创新"));

    let features = [
        ("🇨🇳 中文命令", "npm run 预览 | npm run 推送 | npm run 测试"),
        ("🔄 智能同步", "自动数据质量检查 + 完整性验证"),
        ("✅ 完整测试", "Jest单元测试 + Playwright E2E"),
        ("💾 自动备份", "npm run backup / rollback"),
        ("📊 质量监控", "代码质量优化 + 性能监控"),
        ("🤖 MCP集成", "多服务协同 (Feishu/GitHub/SQLite)"),
    ];
    let pairs: Vec<(String, &str)> = features
        .iter()
        .map(|(label, desc)| (label.to_string(), *desc))
        .collect();

    let content = text_box(0.8, 1.8, 8.4, 5.0)
        .word_wrap(true)
        .with_paragraph(Paragraph::empty());
    slide.add_text_box(labelled_pairs(content, &pairs, 24.0, 6.0, 18.0, 16.0));

    slide
}

fn highlights() -> Slide {
    let mut slide = Slide::new();
    slide.add_text_box(heading("技术亮点与创新"));

    let highlights = [
        "🎯 混合技术栈：前端原生JS + 后端Serverless",
        "🔍 双文件系统：优化版本与源文件并存",
        "📡 实时数据流：飞书 → KV → 前端展示",
        "🧠 智能RAG：向量检索 + 语义理解",
        "⚙️ 自动化流程：测试/构建/部署一体化",
        "🔐 安全机制：API鉴权 + 数据加密",
    ];
    slide.add_text_box(plain_list(text_box(1.0, 2.0, 8.0, 4.5), &highlights, 22.0, 20.0));

    slide
}

fn thanks() -> Slide {
    let mut slide = Slide::new().with_background(SVTR_BLUE);

    slide.add_text_box(
        text_box(1.0, 2.5, 8.0, 1.5).with_paragraph(
            Paragraph::new("感谢观看")
                .size(64.0)
                .bold()
                .color(WHITE)
                .align(Alignment::Center),
        ),
    );

    slide.add_text_box(
        text_box(1.0, 4.5, 8.0, 1.5)
            .word_wrap(true)
            .with_paragraph(
                Paragraph::new("🌐 官网：https://svtr.ai")
                    .size(24.0)
                    .color(WHITE)
                    .align(Alignment::Center),
            )
            .with_paragraph(
                Paragraph::new("💻 GitHub：github.com/capmapt/chatsvtr")
                    .size(24.0)
                    .color(WHITE)
                    .align(Alignment::Center)
                    .space_before(12.0),
            ),
    );

    slide
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(slide: &Slide) -> Vec<&str> {
        slide
            .text_boxes
            .iter()
            .flat_map(|b| b.paragraphs.iter())
            .map(|p| p.text.as_str())
            .filter(|t| !t.is_empty())
            .collect()
    }

    #[test]
    fn test_slide_count_and_page_size() {
        let deck = chatsvtr_deck();
        assert_eq!(deck.slides.len(), SLIDE_COUNT);
        assert_eq!(deck.width.emu(), 9_144_000);
        assert_eq!(deck.height.emu(), 6_858_000);
    }

    #[test]
    fn test_only_cover_and_thanks_have_background() {
        let deck = chatsvtr_deck();
        let backgrounds: Vec<_> = deck.slides.iter().map(|s| s.background).collect();

        assert_eq!(backgrounds[0], Some(SVTR_BLUE));
        assert_eq!(backgrounds[9], Some(SVTR_BLUE));
        assert!(backgrounds[1..9].iter().all(Option::is_none));
    }

    #[test]
    fn test_content_slide_headings() {
        let deck = chatsvtr_deck();
        let headings: Vec<&str> = deck.slides[1..9]
            .iter()
            .map(|s| s.text_boxes[0].paragraphs[0].text.as_str())
            .collect();

        assert_eq!(
            headings,
            vec![
                "项目概述",
                "核心技术栈",
                "AI & RAG 智能问答系统",
                "核心功能模块",
                "开发工作流",
                "性能优化成果",
                "开发体验创新",
                "技术亮点与创新",
            ]
        );

        for slide in &deck.slides[1..9] {
            let title = &slide.text_boxes[0].paragraphs[0];
            assert_eq!(title.font.size, Some(Length::pt(44.0)));
            assert!(title.font.bold);
            assert_eq!(title.font.color, Some(SVTR_DARK));
        }
    }

    #[test]
    fn test_cover_text() {
        let deck = chatsvtr_deck();
        assert_eq!(
            texts(&deck.slides[0]),
            vec![
                "ChatSVTR",
                "SVTR.AI 全球AI创投平台 - 产品功能介绍",
                "硅谷科技评论 | 2025"
            ]
        );
        let footer = &deck.slides[0].text_boxes[2].paragraphs[0];
        assert_eq!(footer.font.color, Some(PALE_BLUE));
        assert_eq!(footer.alignment, Some(Alignment::Center));
    }

    #[test]
    fn test_overview_keeps_leading_blank_paragraph() {
        let deck = chatsvtr_deck();
        let content = &deck.slides[1].text_boxes[1];

        assert!(content.word_wrap);
        assert_eq!(content.paragraphs.len(), 6);
        assert!(content.paragraphs[0].is_empty());
        assert_eq!(content.paragraphs[1].text, "• 定位: 全球AI创投行业的统一平台");
        assert_eq!(content.paragraphs[5].space_after, Some(Length::pt(12.0)));
    }

    #[test]
    fn test_rag_pairs() {
        let deck = chatsvtr_deck();
        let lines = texts(&deck.slides[3]);

        assert_eq!(lines.len(), 1 + 12);
        assert_eq!(lines[1], "🔹 混合RAG架构");
        assert_eq!(lines[2], "   结合向量搜索与关键词检索");
        assert_eq!(lines[10], "   App ID: cli_a8e2014cbe7d9013");

        let label = &deck.slides[3].text_boxes[1].paragraphs[1];
        assert_eq!(label.font.color, Some(SVTR_BLUE));
        assert_eq!(label.space_after, Some(Length::pt(6.0)));
        let detail = &deck.slides[3].text_boxes[1].paragraphs[2];
        assert_eq!(detail.font.color, None);
        assert_eq!(detail.space_after, Some(Length::pt(14.0)));
    }

    #[test]
    fn test_two_column_slides() {
        let deck = chatsvtr_deck();

        let stack = &deck.slides[2];
        assert_eq!(stack.text_boxes.len(), 3);
        assert_eq!(stack.text_boxes[1].paragraphs[0].text, "前端技术");
        assert_eq!(stack.text_boxes[1].paragraphs[1].text, "  • 原生 HTML5/CSS3/JavaScript");
        assert_eq!(stack.text_boxes[2].left, Length::inches(5.2));
        assert_eq!(stack.text_boxes[2].paragraphs[4].text, "  • OpenAI GPT + Workers AI");

        let workflow = &deck.slides[5];
        assert_eq!(workflow.text_boxes[1].paragraphs.len(), 6);
        assert_eq!(workflow.text_boxes[2].paragraphs[0].text, "构建 & 部署");
        assert_eq!(
            workflow.text_boxes[2].paragraphs[4].text,
            "  • npm run deploy:cloudflare → 部署"
        );
        assert_eq!(workflow.text_boxes[2].paragraphs[4].font.size, Some(Length::pt(16.0)));
    }

    #[test]
    fn test_thanks_slide() {
        let deck = chatsvtr_deck();
        let slide = &deck.slides[9];

        assert_eq!(
            texts(slide),
            vec![
                "感谢观看",
                "🌐 官网：https://svtr.ai",
                "💻 GitHub：github.com/capmapt/chatsvtr"
            ]
        );
        let repo = &slide.text_boxes[1].paragraphs[1];
        assert_eq!(repo.space_before, Some(Length::pt(12.0)));
        assert_eq!(repo.alignment, Some(Alignment::Center));
    }

    #[test]
    fn test_every_box_has_a_paragraph() {
        let deck = chatsvtr_deck();
        assert!(deck
            .slides
            .iter()
            .flat_map(|s| s.text_boxes.iter())
            .all(|b| !b.paragraphs.is_empty()));
    }
}
