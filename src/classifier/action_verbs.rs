// WHY: Centralized action-verb vocabulary shared by the cue, action and corrector rules
// Present-tense third-person verbs open most Arabic action lines ("يدخل أحمد")

use std::collections::HashSet;

/// Verbs that mark a line as stage action when they open it (or, for longer
/// punctuated lines, appear anywhere in it)
pub const ACTION_VERBS: &[&str] = &[
    "يدخل", "يخرج", "ينظر", "يرفع", "تبتسم", "ترقد", "تقف", "يبسم", "يضع", "يقول",
    "تنظر", "تربت", "تقوم", "يشق", "تشق", "تضرب", "يسحب", "يلتفت", "يقف", "يجلس",
    "تجلس", "يجري", "تجري", "يمشي", "تمشي", "يركض", "تركض", "يصرخ", "اصرخ", "يبكي",
    "تبكي", "يضحك", "تضحك", "يغني", "تغني", "يرقص", "ترقص", "يأكل", "تأكل", "يشرب",
    "تشرب", "ينام", "تنام", "يستيقظ", "تستيقظ", "يكتب", "تكتب", "يقرأ", "تقرأ", "يسمع",
    "تسمع", "يشم", "تشم", "يلمس", "تلمس", "يأخذ", "تأخذ", "يعطي", "تعطي", "يفتح",
    "تفتح", "يغلق", "تغلق", "يبدأ", "تبدأ", "ينتهي", "تنتهي", "يذهب", "تذهب", "يعود",
    "تعود", "يأتي", "تأتي", "يموت", "تموت", "يحيا", "تحيا", "يقاتل", "تقاتل", "ينصر",
    "تنتصر", "يخسر", "تخسر", "يرسم", "ترسم", "يصمم", "تخطط", "يقرر", "تقرر", "يفكر",
    "تفكر", "يتذكر", "تذكر", "يحاول", "تحاول", "يستطيع", "تستطيع", "يريد", "تريد",
    "يحتاج", "تحتاج", "يبحث", "تبحث", "يجد", "تجد", "يفقد", "تفقد", "يحمي", "تحمي",
    "يراقب", "تراقب", "يخفي", "تخفي", "يكشف", "تكشف", "يكتشف", "تكتشف", "يعرف", "تعرف",
    "يتعلم", "تعلن", "يعلم", "يوجه", "توجه", "يسافر", "تسافر", "يرحل", "ترحل", "يبقى",
    "تبقى", "ينتقل", "تنتقل", "يتغير", "تتغير", "ينمو", "تنمو", "يتطور", "تتطور", "يواجه",
    "تواجه", "يحل", "تحل", "يفشل", "تفشل", "ينجح", "تنجح", "يحقق", "تحقن", "ينهي",
    "تنهي", "يوقف", "توقف", "يستمر", "تستمر", "ينقطع", "تنقطع", "يرتبط", "ترتبط", "ينفصل",
    "تنفصل", "يتزوج", "تتزوج", "يطلق", "يولد", "تولد", "يكبر", "تكبر", "يشيخ", "تشيخ",
    "يمرض", "تمرض", "يشفي", "تشفي", "يصاب", "تصيب", "يتعافى", "تعافي", "يقتل", "تقتل",
    "يُقتل", "تُقتل", "يختفي", "تختفي", "يظهر", "تظهر", "يختبئ", "تخبوء", "يطلب", "تطلب",
    "يأمر", "تأمر", "يمنع", "تمنع", "يسمح", "تسمح", "يوافق", "توافق", "يرفض", "ترفض",
    "يعتذر", "تعتذر", "يغفر", "يحب", "تحب", "يبغض", "يكره", "يحسد", "تحسد", "يغبط",
    "تعجب",
];

/// Observation verbs that open camera-view action lines ("نرى الباب يُفتح")
pub const OBSERVATION_VERBS: &[&str] = &[
    "نرى", "ننظر", "نسمع", "نلاحظ", "يبدو", "يظهر", "يبدأ", "ينتهي", "يستمر", "يتوقف",
    "يتحرك", "يحدث", "يكون", "يوجد", "توجد", "تظهر",
];

/// Action-verb lookup used by the classifier rules
pub struct ActionVerbChecker {
    verbs: HashSet<&'static str>,
}

impl ActionVerbChecker {
    pub fn new() -> Self {
        Self {
            verbs: ACTION_VERBS.iter().copied().collect(),
        }
    }

    pub fn is_action_verb(&self, word: &str) -> bool {
        self.verbs.contains(word)
    }

    /// Check whether the first word of an already-normalized line is an action verb
    pub fn starts_with_action_verb(&self, normalized: &str) -> bool {
        normalized
            .split_whitespace()
            .next()
            .is_some_and(|first| self.is_action_verb(first))
    }

    /// Check whether any action verb occurs anywhere in the normalized line.
    /// Substring match: "ويدخل" still counts as containing "يدخل".
    pub fn contains_action_verb(&self, normalized: &str) -> bool {
        ACTION_VERBS.iter().any(|verb| normalized.contains(verb))
    }
}

impl Default for ActionVerbChecker {
    fn default() -> Self {
        Self::new()
    }
}
