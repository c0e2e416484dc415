// Screenplay fixtures with known block output
// WHY: Golden-file testing requires deterministic input/output pairs for validation

/// Short scene exercising every format the paste importer emits
pub const SAMPLE_SCRIPT: &str = "بسم الله الرحمن الرحيم
مشهد 1 - ليل/داخلي
غرفة المعيشة
يدخل أحمد ببطء
أحمد:
(بهدوء)
مرحبا يا سارة
تقف سارة وتخرج

• سارة: أين كنت
قطع
مشهد 2";

/// Expected blocks for SAMPLE_SCRIPT
/// Format: format|segment|segment...
pub const SAMPLE_EXPECTED: &str = "basmala|بسم الله الرحمن الرحيم
scene-header-full|مشهد 1|ليل/داخلي
scene-header-alt|غرفة المعيشة
action|يدخل أحمد ببطء
character|أحمد:
parenthetical|(بهدوء)
dialogue|مرحبا يا سارة
action|تقف سارة وتخرج
action|
character|سارة:
dialogue|أين كنت
transition|قطع
scene-header-solo|مشهد 2";

/// Same scene saved with Windows line endings
pub const SAMPLE_SCRIPT_CRLF: &str = "أحمد:\r\nمرحبا\r\n\r\nقطع\r\n";

/// Expected blocks for SAMPLE_SCRIPT_CRLF (the reader drops the final empty line)
pub const SAMPLE_CRLF_EXPECTED: &str = "character|أحمد:
dialogue|مرحبا
action|
transition|قطع";

/// Lines that must classify without panicking
pub const HOSTILE_LINES: &[&str] = &[
    "",
    "\u{0}",
    "\t\t",
    ":",
    "::::",
    "(",
    ")(",
    "()",
    "•",
    "- :",
    "—",
    "مشهد",
    "مشهد 99999999999999999999999",
    "CUT TO:",
    "fade out:",
    "Hello, world!",
    "🦀 أحمد 🦀:",
    "\u{200F}سارة:\u{200E}",
    "{بسم الله الرحمن الرحيم}",
    "((((((((((((((((((((",
];
