//! Fixed vocabulary tables behind the resume classifiers and identity extractor.
//!
//! All entries are lowercase; callers lowercase the text they scan.

/// Commercial resume builders, job boards, social networks and academic publishers.
/// Matched as case-insensitive substrings of the whole URL.
pub const BLOCKED_DOMAINS: &[&str] = &[
    "resume.io",
    "myperfectresume.com",
    "zety.com",
    "novoresume.com",
    "resumegenius.com",
    "livecareer.com",
    "indeed.com",
    "monster.com",
    "glassdoor.com",
    "thebalancemoney.com",
    "thebalancecareers.com",
    "easypdf.live",
    "pdfcoffee.com",
    "scribd.com",
    "slideshare.net",
    "pinterest.com",
    "facebook.com",
    "twitter.com",
    "instagram.com",
    "resumetemplates",
    "resumebuilder",
    "resume-now",
    "resumehelp",
    "hloom.com",
    "canva.com",
    "visme.co",
    "kickresume.com",
    "careercup.com",
    "beamjobs.com",
    "enhancv.com",
    "cvmaker",
    "resumecoach",
    "visualcv.com",
    "standardresume.co",
    "rxresu.me",
    "overleaf.com",
    "coolfreecv.com",
    "freesumes.com",
    "resumelab.com",
    "resumecat",
    "resumeworded",
    "jobscan.co",
    "rezi.ai",
    "tealhq.com",
    "how2become.com",
    "theinterviewguys.com",
    "jobhero.com",
    "velvetjobs.com",
    "qwikresume.com",
    "resumekraft.com",
    "resumeok.com",
    "greatresumesfast.com",
    "nursingcenter.com",
    "journals.lww.com",
    "wolterskluwer.com",
    "pubmed.gov",
    "ncbi.nlm.nih.gov",
    "researchgate.net",
    "sciencedirect.com",
    "springer.com",
    "wiley.com",
    "elsevier.com",
    "tandfonline.com",
    "sagepub.com",
    "oup.com",
    "cambridge.org/core",
    "nature.com",
    "bmj.com",
    "jamanetwork.com",
];

/// Title vocabulary of template, guide and other non-resume document pages.
/// A single hit rejects.
pub const TEMPLATE_TITLE_WORDS: &[&str] = &[
    "template",
    "templates",
    "example",
    "examples",
    "sample",
    "samples",
    "guide",
    "how to",
    "tips",
    "writing guide",
    "create your",
    "build your",
    "best resume",
    "top resume",
    "free download",
    "2024",
    "2025",
    "format guide",
    "resume writing service",
    "resume help",
    "resume tips",
    "career advice",
    "job search tips",
    "interview tips",
    "hiring manager",
    "workbook",
    "cover letter",
    "worksheet",
    "checklist",
    "toolkit",
    "test report",
    "product report",
    "technical report",
    "lab report",
    "specification",
    "datasheet",
    "data sheet",
    "manual",
    "handbook",
    "catalog",
    "catalogue",
    "brochure",
    "flyer",
    "newsletter",
    "press release",
    "annual report",
    "quarterly report",
    "white paper",
    "case study",
    "research paper",
    "thesis",
    "dissertation",
    "certificate of",
    "certification",
    "compliance",
    "inspection",
    "safety data",
    "material safety",
    "msds",
    "sds",
    "invoice",
    "receipt",
    "order form",
    "application form",
    "building products",
    "crown building",
    "test results",
];

/// Court filing vocabulary. Two hits reject.
pub const LEGAL_INDICATORS: &[&str] = &[
    "case 1:",
    "case no.",
    "case number",
    "docket",
    "filed",
    "plaintiff",
    "defendant",
    "v.",
    "vs.",
    "court",
    "judgment",
    "order",
    "motion",
    "district court",
    "circuit court",
    "bankruptcy",
    "petition",
    "complaint",
    "stipulated",
    "settlement",
    "injunction",
    "civil action",
    "document 3",
    "page 1 of",
    "page 2 of",
    "bureau of",
    "united states district",
];

/// Job advertisement vocabulary. One hit rejects.
pub const JOB_POSTING_INDICATORS: &[&str] = &[
    "we are hiring",
    "apply now",
    "job description",
    "job posting",
    "job opening",
    "now hiring",
    "position available",
    "join our team",
    "career opportunity",
    "employment opportunity",
    "job opportunity",
    "salary range",
    "salary:",
    "benefits:",
    "requirements:",
    "responsibilities:",
    "qualifications:",
    "how to apply",
    "submit your resume",
    "send your resume",
    "equal opportunity employer",
    "eoe",
    "full-time position",
    "part-time position",
    "remote position",
    "hybrid position",
    "we offer",
    "competitive salary",
    "health insurance",
    "401k",
    "pto",
    "paid time off",
    "job id:",
    "requisition",
    "posting date",
    "closing date",
    "application deadline",
    "about the company",
    "about us",
    "who we are",
    "what you'll do",
    "what we're looking for",
];

/// Product test reports and institutional paperwork. Two hits reject.
pub const PRODUCT_DOC_INDICATORS: &[&str] = &[
    "test report",
    "intertek",
    "ul listed",
    "scope of work",
    "impact resistance",
    "fm approved",
    "astm",
    "ansi",
    "testing of",
    "test results",
    "specimen",
    "sample tested",
    "report number",
    "project number",
    "client:",
    "manufacturer:",
    "model:",
    "product:",
    "part number",
    "sapi de cv",
    "dba crown",
    "s.a. de c.v.",
    "total quality assured",
    "quality assurance program",
    "grant process",
    "grant application",
    "application process",
    "policy and procedure",
    "procedure manual",
    "training manual",
    "employee handbook",
    "strategic plan",
    "annual report",
    "quarterly report",
    "fiscal year",
    "request for proposal",
    "rfp",
    "rfi",
    "board of directors",
    "governance",
    "bylaws",
];

/// Markers that identify a journal article on their own.
pub const ACADEMIC_STRONG_MARKERS: &[&str] = &[
    "journal of",
    "themed issue",
    "doi:",
    "doi#",
];

/// Broader scholarly vocabulary. Two hits reject.
pub const ACADEMIC_ARTICLE_INDICATORS: &[&str] = &[
    "abstract",
    "keywords:",
    "doi:",
    "doi#",
    "journal of",
    "themed issue",
    "american association",
    "nurse practitioners",
    "professional development",
    "biosketch",
    "biosketches",
    "business documents",
    "introducing the documents",
    "supplemental digital",
    "content 2",
    "copyright ©",
    "© 20",
    "author:",
    "authors:",
    "correspondence:",
    "affiliations",
    "published by",
    "published in",
    "peer-reviewed",
    "peer reviewed",
    "research article",
    "original article",
    "review article",
    "clinical article",
    "methods:",
    "results:",
    "conclusion:",
    "discussion:",
    "references",
    "bibliography",
    "citations",
    "cited by",
    "volume ",
    "issue ",
    "pages ",
    "pp.",
    "et al.",
    "manuscript",
    "submitted",
    "accepted",
    "received",
    "acknowledgments",
    "funding:",
    "conflict of interest",
    "institutional review board",
    "irb",
    "informed consent",
    "study design",
    "sample size",
    "data analysis",
    "statistical analysis",
];

/// Career-advice and resume-builder marketing copy seen in snippets.
pub const MARKETING_PHRASES: &[&str] = &[
    "vital step for",
    "seeking to advance your",
    "looking for a job",
    "resume writing is a",
    "for job seekers",
    "resume writing service",
    "how to write a resume",
    "resume format guide",
    "resume builder tool",
    "download our",
    "try our",
    "sign up",
    "create your resume",
    "first impression",
    "important first",
    "things you can do",
];

/// Phrases a real resume snippet tends to carry.
pub const EXPERIENCE_INDICATORS: &[&str] = &[
    "years of experience",
    "worked at",
    "responsible for",
    "bachelor",
    "master",
    "b.s.",
    "m.s.",
    "degree in",
    "certified",
    "license",
    "rn ",
    "lpn ",
    "bsn",
    "msn",
    "graduated",
    "university",
    "college",
];

/// News and press vocabulary.
pub const NEWS_INDICATORS: &[&str] = &[
    "press release",
    "news article",
    "published",
    "reported",
    "announced",
];

/// Company, team and directory page vocabulary.
pub const CORPORATE_PAGE_INDICATORS: &[&str] = &[
    "about us",
    "our team",
    "meet the team",
    "staff directory",
    "board of directors",
];

/// Vocabulary required (alongside contact info) for a result to count as resume content.
pub const RESUME_CONTENT_INDICATORS: &[&str] = &[
    "experience",
    "education",
    "skill",
    "work",
    "degree",
    "university",
    "college",
    "certified",
    "professional",
    "summary",
    "objective",
    "employment",
    "worked",
    "managed",
    "developed",
    "years",
    "qualification",
    "bachelor",
    "master",
    "phd",
    "b.s",
    "m.s",
    "mba",
    "dba",
];

/// Section headings that never carry a person's name.
pub const SECTION_HEADER_WORDS: &[&str] = &[
    "resume",
    "curriculum",
    "vitae",
    "objective",
    "summary",
    "education",
    "experience",
    "qualifications",
    "skills",
];

/// Role and title words that cannot open a name.
pub const ROLE_TITLE_WORDS: &[&str] = &[
    "nurse",
    "senior",
    "junior",
    "staff",
    "lead",
    "chief",
    "head",
    "director",
    "manager",
    "specialist",
    "coordinator",
    "assistant",
    "associate",
    "analyst",
    "engineer",
    "developer",
    "consultant",
    "advisor",
    "officer",
    "executive",
    "registered",
    "licensed",
    "certified",
    "clinical",
    "educator",
    "practitioner",
];

/// Leading words rejected by the bare-name strategy: headings, institutions and roles.
pub const NON_NAME_LEADING_WORDS: &[&str] = &[
    "key",
    "career",
    "work",
    "job",
    "contact",
    "personal",
    "about",
    "dear",
    "cover",
    "nursing",
    "baylor",
    "university",
    "college",
    "hospital",
    "medical",
    "center",
    "health",
    "research",
    "clinical",
    "academy",
    "institute",
    "school",
    "department",
    "senior",
    "junior",
    "staff",
    "lead",
    "chief",
    "head",
    "director",
    "manager",
    "specialist",
    "coordinator",
    "assistant",
    "associate",
    "analyst",
    "engineer",
    "developer",
    "consultant",
    "advisor",
    "officer",
    "executive",
    "administrator",
    "supervisor",
    "educator",
    "practitioner",
    "therapist",
    "technician",
    "registered",
];

/// Words that turn an extracted name into an organisation.
pub const INSTITUTION_WORDS: &[&str] = &[
    "university",
    "college",
    "hospital",
    "medical",
    "center",
    "health",
    "research",
    "clinical",
    "academy",
    "institute",
    "school",
    "department",
    "nursing",
    "baylor",
    "texas",
    "california",
    "florida",
    "attorney",
    "attorneys",
    "providing",
    "services",
    "consulting",
    "legal",
    "corporation",
    "company",
    "inc",
    "llc",
    "group",
    "associates",
];

/// Two-word job titles that look like names.
pub const JOB_TITLE_PHRASES: &[&str] = &[
    "nurse educator",
    "nurse practitioner",
    "nurse manager",
    "nurse specialist",
    "staff nurse",
    "charge nurse",
    "head nurse",
    "clinical nurse",
    "registered nurse",
    "licensed nurse",
    "senior nurse",
    "junior nurse",
];

/// Fragments of template addresses.
pub const PLACEHOLDER_EMAIL_FRAGMENTS: &[&str] = &[
    "example",
    "firstlast",
    "yourname",
    "email.com",
    "sample",
    "placeholder",
];

/// Digit runs that mark a template phone number.
pub const PLACEHOLDER_PHONE_RUNS: &[&str] = &[
    "444444",
];

/// Number of table entries found as substrings of `haystack`.
pub fn count_matches(haystack: &str, table: &[&str]) -> usize {
    table.iter().filter(|entry| haystack.contains(*entry)).count()
}

pub fn contains_any(haystack: &str, table: &[&str]) -> bool {
    table.iter().any(|entry| haystack.contains(entry))
}
