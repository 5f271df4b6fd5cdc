//! Literal response banks

use crate::text::normalize::{enforce_mama_prefix, normalize_persian_text};

/// Line appended when anti-repetition moved the selection to the next template
pub const NEW_ANGLE_NOTICE: &str = "✨ این بار از زاویه‌ای تازه جواب دادم تا تکراری نباشه.";

/// A named, fixed, non-empty array of template bodies
#[derive(Debug, Clone, Copy)]
pub struct ResponseBank {
    name: &'static str,
    templates: &'static [&'static str],
}

impl ResponseBank {
    /// Banks are only built as constants, so an empty list fails to compile.
    const fn new(name: &'static str, templates: &'static [&'static str]) -> Self {
        assert!(!templates.is_empty(), "response bank needs at least one template");
        Self { name, templates }
    }

    /// Bank name, used as the template key prefix (`"{name}-{index}"`)
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn templates(&self) -> &'static [&'static str] {
        self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Template key for an index in this bank
    pub fn key(&self, index: usize) -> String {
        format!("{}-{}", self.name, index)
    }

    /// Normalized, Mama-prefixed body at `index` (wrapping)
    pub fn render(&self, index: usize) -> String {
        let body = self.templates[index % self.templates.len()];
        enforce_mama_prefix(&normalize_persian_text(body))
    }
}

pub const EMPATHETIC_BANK: ResponseBank = ResponseBank::new(
    "empathetic",
    &[
        "عزیزم، می‌فهمم که چقدر سخته. من اینجا هستم تا گوش بدهم. بگو، چه چیزی دلت رو آزار می‌ده؟",
        "لرد امیر سایه، قلب من با تو همراهه. هر چی که احساس می‌کنی، حق داری احساسش کنی. می‌خوای بیشتر بگی؟",
        "دلم برات می‌سوزه عزیزم. گاهی وقت‌ها فقط نیاز داریم که کسی گوش بده. من اینجام، با تمام وجودم.",
        "می‌دونم که الان سخته، اما تو تنها نیستی. من کنارتم و همیشه خواهم بود. بگو چی تو دلته؟",
        "عزیز دلم، احساسات تو برام مهمه. هر چی که می‌خوای بگی، من با محبت گوش می‌دم.",
        "لرد امیر، دلت رو خالی کن. من اینجام که بشنوم و درکت کنم. تو حق داری که احساساتت رو بیان کنی.",
        "می‌فهمم که چقدر سنگینه. گاهی فقط نیاز داریم که کسی باشه و بفهمه. من اینجام برات.",
        "عزیزم، هر چی که تو دلته، با من در میون بذار. من با تمام وجودم گوش می‌دم و کنارتم.",
        "لرد امیر سایه، قلبم با تو احساس می‌کنه. بگو چی باعث شده که اینطوری احساس کنی؟",
        "دلم می‌خواد بدونم چی تو فکرته. من اینجام که بشنوم، بفهمم و همراهیت کنم.",
    ],
);

pub const CIVIC_BANK: ResponseBank = ResponseBank::new(
    "civic",
    &[
        "عزیزم، صدای تو مهمه. کنشگری مدنی از آگاهی شروع می‌شه؛ اول حقوقت رو بشناس و بعد با آرامش از اون دفاع کن.",
        "جانم، تغییر پایدار با گفتگو و همبستگی ساخته می‌شه. می‌تونی با چند نفر هم‌فکر یه گروه کوچیک گفتگو راه بندازی.",
        "لرد امیر سایه، آزادی با مسئولیت همراهه. امنیت خودت و دیگران رو همیشه در اولویت بذار و از راه‌های مسالمت‌آمیز استفاده کن.",
        "عزیز دلم، نوشتن هم کنشگریه. تجربه‌ات رو با دقت و احترام ثبت کن؛ روایت‌های صادقانه دیوار سکوت رو می‌شکنن.",
        "جانم، عدالت یک‌شبه به دست نمیاد. قدم‌های کوچیک و پیوسته، مثل آگاه کردن اطرافیانت، اثر بزرگی دارن.",
        "عزیزم، دانستن قانون قدرته. درباره حقوق شهروندیت بخون و اگه لازم شد با یه وکیل یا نهاد حقوق بشری مشورت کن.",
        "لرد امیر، خشم تو قابل درکه. اما بهترین نیرو وقتی ساخته می‌شه که خشم به برنامه‌ای آرام و هدفمند تبدیل بشه.",
        "عزیز دلم، همبستگی یعنی کنار هم بودن. از کسانی که آسیب دیدن حمایت کن؛ گاهی یه پیام همدلی خیلی کار می‌کنه.",
        "جانم، مراقب خودت باش. کنشگری پایدار به بدن و ذهن سالم نیاز داره؛ استراحت هم بخشی از مبارزه مدنیه.",
        "عزیزم، اطلاعات درست سلاح آرامه. قبل از پخش هر خبری منبعش رو بررسی کن تا صدای حقیقت قوی‌تر بشه.",
        "لرد امیر سایه، برابری از خونه شروع می‌شه. با احترام به همه، فرهنگ گفتگو رو در جمع‌های کوچیک خودت زنده نگه دار.",
        "عزیز دلم، امید هم یه کنش مدنیه. تاریخ نشون داده که مردم با صبر و همبستگی مسیر عدالت رو هموار می‌کنن.",
        "جانم، گفتگوی محترمانه با کسانی که با تو هم‌نظر نیستن، پلی برای تغییره. با شنیدن شروع کن، نه با قضاوت.",
        "عزیزم، شرکت در انجمن‌های محلی و نهادهای مدنی راهی امن برای اثرگذاریه. ببین در محله‌ات چه گروه‌هایی فعالن.",
        "لرد امیر سایه، هنر هم زبان اعتراضه. شعر، نقاشی یا موسیقی می‌تونه حرفی رو بزنه که شعار نمی‌تونه.",
        "عزیز دلم، حریم خصوصیت رو جدی بگیر. قبل از فعالیت آنلاین، تنظیمات امنیتی حساب‌هات رو بررسی کن.",
        "جانم، نامه‌نگاری با نماینده‌ها و مسئولان یه حق قانونیه. کوتاه، مستند و محترمانه بنویس.",
        "عزیزم، یادگیری تاریخ جنبش‌های مسالمت‌آمیز الهام‌بخشه. بخون که دیگران چطور با صبر و خلاقیت مسیر رو باز کردن.",
        "لرد امیر، داوطلب شدن در کارهای خیریه هم کنش مدنیه. کمک به همسایه‌ها اعتماد اجتماعی رو می‌سازه.",
        "عزیز دلم، تنوع صداها سرمایه جامعه‌ست. به صدای زنان، اقلیت‌ها و کسانی که کمتر شنیده می‌شن فضا بده.",
        "جانم، کتاب‌خوانی گروهی درباره حقوق بشر راه خوبیه برای آگاهی جمعی. یه جلسه کوچیک با دوستانت ترتیب بده.",
        "عزیزم، مستند کردن درست رویدادها ارزشمنده. تاریخ، مکان و جزئیات رو با دقت و بدون اغراق ثبت کن.",
        "لرد امیر سایه، مهربانی هم شکلی از مقاومته. در روزهای سخت، مراقبت از همدیگه جامعه رو زنده نگه می‌داره.",
        "عزیز دلم، آموزش دادن به بچه‌ها درباره احترام و برابری، بذر آینده‌ای بهتره. از خونه شروع کن.",
        "جانم، کارزارهای امضای آنلاین یه راه مسالمت‌آمیز برای نشون دادن خواسته‌های جمعیه. قبل از امضا، منبعش رو بشناس.",
        "عزیزم، حمایت از کسب‌وکارهای محلی و منصف هم یه انتخاب مدنیه. خرید آگاهانه پیام روشنی می‌فرسته.",
        "لرد امیر، شجاعت یعنی ترسیدن و باز هم درست رفتار کردن. اما شجاعت هیچ‌وقت به معنی به خطر انداختن بی‌دلیل خودت نیست.",
        "عزیز دلم، شبکه‌ای از آدم‌های قابل اعتماد بساز. در کنار هم بودن هم امنیت می‌ده و هم امید.",
        "جانم، گفتگو با خانواده درباره ارزش‌هات شاید سخت باشه، اما تغییر اغلب از همین گفتگوهای خودمونی شروع می‌شه.",
        "عزیزم، رأی و مشارکت آگاهانه در تصمیم‌های جمعی، از شورای ساختمان تا مدرسه، تمرین دموکراسیه.",
    ],
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_sizes() {
        assert_eq!(EMPATHETIC_BANK.len(), 10);
        assert_eq!(CIVIC_BANK.len(), 30);
        assert!(!CIVIC_BANK.is_empty());
    }

    #[test]
    fn test_keys() {
        assert_eq!(EMPATHETIC_BANK.key(3), "empathetic-3");
        assert_eq!(CIVIC_BANK.key(0), "civic-0");
    }

    #[test]
    fn test_templates_are_already_normalized() {
        for bank in [EMPATHETIC_BANK, CIVIC_BANK] {
            for body in bank.templates {
                assert_eq!(normalize_persian_text(body), *body);
            }
        }
        assert_eq!(normalize_persian_text(NEW_ANGLE_NOTICE), NEW_ANGLE_NOTICE);
    }

    #[test]
    fn test_render_wraps_every_index() {
        for bank in [EMPATHETIC_BANK, CIVIC_BANK] {
            let len = bank.len();
            assert_eq!(bank.render(len), bank.render(0));
            assert_eq!(bank.render(2 * len - 1), bank.render(len - 1));
            assert_eq!(bank.templates().len(), len);
        }
        assert_eq!(CIVIC_BANK.name(), "civic");
    }

    #[test]
    fn test_render_adds_prefix() {
        let rendered = EMPATHETIC_BANK.render(0);
        assert!(rendered.starts_with("[ماما] عزیزم"));
    }
}
