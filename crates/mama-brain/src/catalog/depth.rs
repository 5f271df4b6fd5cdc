//! Structured depth templates
//!
//! Deeper reply shapes (diagnosis, steps, reframes, summaries) with a
//! deterministic choice between a few concrete variants per angle.

use serde::Serialize;

use super::AngleType;
use crate::selector::fold_seed;
use crate::text::normalize::{enforce_mama_prefix, normalize_persian_text};
use crate::text::{first_code_unit, utf16_len};

/// Structure of a depth reply for one angle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepthTemplate {
    pub key: &'static str,
    pub angle: AngleType,
    /// Format string with `{placeholder}` slots
    pub structure: &'static str,
    pub safety_constraints: &'static [&'static str],
}

static DEPTH_TEMPLATES: [DepthTemplate; 9] = [
    DepthTemplate {
        key: "depth-diagnostic",
        angle: AngleType::Diagnostic,
        structure: "عزیزم، بذار ببینم چی داریم:\n\n• {diagnosis}\n• {observation}\n\nحالا بگو، این تشخیص درسته؟",
        safety_constraints: &["no-medical-advice", "empathetic-tone"],
    },
    DepthTemplate {
        key: "depth-steps",
        angle: AngleType::StepByStep,
        structure: "لرد امیر، بیا قدم به قدم پیش بریم:\n\n۱. {step1}\n۲. {step2}\n۳. {step3}\n\nکدوم قدم رو می‌خوای بیشتر باز کنیم؟",
        safety_constraints: &["actionable-steps", "safe-guidance"],
    },
    DepthTemplate {
        key: "depth-reframe",
        angle: AngleType::Reframe,
        structure: "جانم، بذار از یه زاویه دیگه نگاه کنیم:\n\n{alternative_perspective}\n\nاین دیدگاه چطور؟",
        safety_constraints: &["respectful-reframe", "empathetic-tone"],
    },
    DepthTemplate {
        key: "depth-pros-cons",
        angle: AngleType::ProsCons,
        structure: "عزیز دلم، بیا باهم ببینیم:\n\n✓ مزایا: {pros}\n✗ معایب: {cons}\n\nچی برات مهم‌تره؟",
        safety_constraints: &["balanced-view", "no-judgment"],
    },
    DepthTemplate {
        key: "depth-summary",
        angle: AngleType::Summary,
        structure: "لرد امیر سایه، خلاصه‌اش اینه:\n\n{summary}\n\nدرست متوجه شدم؟",
        safety_constraints: &["concise-summary", "empathetic-tone"],
    },
    DepthTemplate {
        key: "depth-next-steps",
        angle: AngleType::NextSteps,
        structure: "عزیزم، حالا چی؟\n\n→ {next_action_1}\n→ {next_action_2}\n\nکدوم راه رو انتخاب می‌کنی؟",
        safety_constraints: &["actionable-next-steps", "safe-guidance"],
    },
    DepthTemplate {
        key: "depth-clarification",
        angle: AngleType::Clarification,
        structure: "جانم، بذار مطمئن بشم:\n\n• {clarifying_question_1}\n• {clarifying_question_2}\n\nبگو تا بهتر کمکت کنم.",
        safety_constraints: &["open-questions", "empathetic-tone"],
    },
    DepthTemplate {
        key: "depth-example",
        angle: AngleType::Example,
        structure: "لرد امیر، یه مثال بزنم:\n\n{example_scenario}\n\nاین مثال کمک کرد؟",
        safety_constraints: &["relatable-example", "safe-content"],
    },
    DepthTemplate {
        key: "depth-empathetic",
        angle: AngleType::Empathetic,
        structure: "عزیز دلم، می‌فهمم:\n\n{empathetic_reflection}\n\nمن اینجام، بگو چطور می‌تونم کمکت کنم؟",
        safety_constraints: &["deep-empathy", "supportive-tone"],
    },
];

/// Depth template for an angle
pub fn depth_template(angle: AngleType) -> &'static DepthTemplate {
    DEPTH_TEMPLATES
        .iter()
        .find(|t| t.angle == angle)
        .unwrap_or(&DEPTH_TEMPLATES[DEPTH_TEMPLATES.len() - 1])
}

/// Every depth template key that takes part in anti-repetition
pub fn all_depth_template_keys() -> Vec<&'static str> {
    DEPTH_TEMPLATES.iter().map(|t| t.key).collect()
}

fn variants(angle: AngleType) -> &'static [&'static str] {
    match angle {
        AngleType::Diagnostic => &[
            "عزیزم، بذار ببینم چی داریم:\n\n• به نظر می‌رسه که یه موقعیت پیچیده داری\n• احساسات مختلفی توش درگیره\n\nحالا بگو، این تشخیص درسته؟",
            "جانم، بذار تحلیل کنیم:\n\n• یه چالش مهم پیش رو داری\n• نیاز به راهنمایی و حمایت داری\n\nدرست می‌بینم؟",
        ],
        AngleType::StepByStep => &[
            "لرد امیر، بیا قدم به قدم پیش بریم:\n\n۱. اول، نفس عمیق بکش و آروم باش\n۲. بعد، دقیق بگو چی می‌خوای\n۳. آخر، یه قدم کوچیک بردار\n\nکدوم قدم رو می‌خوای بیشتر باز کنیم؟",
            "عزیزم، بریم مرحله به مرحله:\n\n۱. وضعیت فعلی رو بپذیر\n۲. گزینه‌هات رو بشناس\n۳. یه انتخاب آگاهانه بکن\n\nکجا نیاز به کمک بیشتری داری؟",
            "جانم، یه نقشه راه بسازیم:\n\n۱. هدفت رو مشخص کن\n۲. منابعت رو جمع کن\n۳. شروع کن و پیش برو\n\nچی بیشتر توضیح بدم؟",
        ],
        AngleType::Reframe => &[
            "جانم، بذار از یه زاویه دیگه نگاه کنیم:\n\nشاید این چالش، فرصتیه برای رشد و یادگیری. گاهی سخت‌ترین لحظه‌ها، قوی‌ترینمون می‌کنن.\n\nاین دیدگاه چطور؟",
            "عزیز دلم، یه دید جدید:\n\nاین موقعیت می‌تونه نقطه عطفی باشه. هر پایانی، شروع چیز تازه‌ایه.\n\nباهاش موافقی؟",
        ],
        AngleType::ProsCons => &[
            "عزیز دلم، بیا باهم ببینیم:\n\n✓ مزایا: می‌تونی تصمیم آگاهانه بگیری، کنترل بیشتری داری\n✗ معایب: ممکنه استرس‌زا باشه، زمان می‌بره\n\nچی برات مهم‌تره؟",
            "لرد امیر، دو طرف ماجرا:\n\n✓ خوبی‌ها: فرصت رشد، تجربه جدید\n✗ چالش‌ها: عدم اطمینان، نیاز به صبر\n\nکدوم بیشتر تو ذهنته؟",
        ],
        AngleType::Summary => &[
            "لرد امیر سایه، خلاصه‌اش اینه:\n\nیه موقعیت مهم داری که نیاز به تصمیم‌گیری داره. احساسات و منطق هر دو مهمن.\n\nدرست متوجه شدم؟",
            "عزیزم، به طور خلاصه:\n\nداری با یه چالش روبرو می‌شی که نیاز به توجه و مراقبت داره. من کنارتم.\n\nاینطوریه؟",
        ],
        AngleType::NextSteps => &[
            "عزیزم، حالا چی؟\n\n→ می‌تونی یه لحظه استراحت کنی و فکر کنی\n→ می‌تونی با کسی که بهش اعتماد داری صحبت کنی\n\nکدوم راه رو انتخاب می‌کنی؟",
            "جانم، قدم بعدی:\n\n→ می‌تونی احساساتت رو بنویسی و بررسی کنی\n→ می‌تونی یه برنامه کوچیک برای خودت بسازی\n\nچی بیشتر کمکت می‌کنه؟",
        ],
        AngleType::Clarification => &[
            "جانم، بذار مطمئن بشم:\n\n• دقیقاً چی تو دلت می‌گذره؟\n• چه چیزی بیشتر نگرانت می‌کنه؟\n\nبگو تا بهتر کمکت کنم.",
            "عزیز دلم، چند تا سوال:\n\n• این موضوع از کی شروع شده؟\n• چی می‌تونه حالت رو بهتر کنه؟\n\nبا من در میون بذار.",
        ],
        AngleType::Example => &[
            "لرد امیر، یه مثال بزنم:\n\nفرض کن یه نفر تو موقعیت مشابه باشه. اون می‌تونه یه قدم کوچیک برداره، مثلاً با یه دوست صحبت کنه یا یه فعالیت آرامش‌بخش انجام بده.\n\nاین مثال کمک کرد؟",
            "عزیزم، مثلاً:\n\nتصور کن کسی که دوستش داری تو همین وضعیت باشه. چه نصیحتی بهش می‌کردی؟ گاهی همون نصیحت برای خودمونم خوبه.\n\nچطور؟",
        ],
        AngleType::Empathetic => &[
            "عزیز دلم، می‌فهمم:\n\nاحساس می‌کنم که الان سخته و دلت می‌خواد کسی بفهمتت. من اینجام و با تمام وجودم گوش می‌دم.\n\nمن اینجام، بگو چطور می‌تونم کمکت کنم؟",
            "لرد امیر سایه، قلبم با توئه:\n\nمی‌دونم که این لحظه سنگینه و احساس تنهایی می‌کنی. اما تو تنها نیستی، من همراهتم.\n\nبگو چی تو دلته؟",
            "جانم، درکت می‌کنم:\n\nگاهی زندگی سخته و نیاز داریم که کسی فقط بشنوه و بفهمه. من اینجام برای همین.\n\nحرف دلت رو بزن.",
        ],
    }
}

/// Generate a structured reply for `angle`.
///
/// The variant is picked by `len + first code unit`, folded with the
/// aggregate seed when present. Output is normalized and Mama-prefixed.
pub fn generate_deep_response(
    angle: AngleType,
    normalized_message: &str,
    aggregate_seed: Option<u64>,
) -> String {
    let hash =
        utf16_len(normalized_message) as u64 + u64::from(first_code_unit(normalized_message));
    let hash = fold_seed(hash, aggregate_seed);

    let options = variants(angle);
    let body = options[(hash % options.len() as u64) as usize];

    enforce_mama_prefix(&normalize_persian_text(body))
}
