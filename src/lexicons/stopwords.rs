//! Stopword tables used by the top-word, phrase and topic miners.

/// Polish stopwords, including the common texting shorthands.
pub const POLISH: &[&str] = &[
    "a", "aby", "ale", "albo", "ani", "aż", "bardzo", "bez", "bo", "bowiem", "by", "być", "był",
    "była", "było", "byłem", "byłam", "będzie", "będą", "chce", "chcę", "chyba", "ci", "cię",
    "ciebie", "co", "coś", "czy", "czyli", "często", "daj", "dla", "do", "dziś", "dzisiaj", "gdy",
    "gdyby", "gdzie", "go", "ich", "ile", "im", "inne", "iż", "ja", "jak", "jakie", "jakiś",
    "jako", "je", "jego", "jej", "jest", "jestem", "jesteś", "jeszcze", "jeśli", "jeżeli", "już",
    "ją", "kiedy", "kto", "która", "które", "który", "którzy", "lub", "ma", "mam", "mamy", "masz",
    "mi", "mieć", "mnie", "moja", "moje", "może", "można", "mój", "mu", "my", "na", "nad", "nam",
    "nas", "nasz", "nasza", "nasze", "nawet", "nic", "nie", "niech", "niej", "nim", "nią", "no",
    "nową", "o", "od", "ok", "oraz", "pan", "pani", "po", "pod", "ponieważ", "przed", "przez",
    "przy", "raz", "razie", "również", "się", "sobie", "swoje", "są", "ta", "tak", "taka", "taki",
    "takie", "tam", "te", "tego", "tej", "temu", "ten", "teraz", "też", "to", "tobie", "trzeba",
    "tu", "tutaj", "twoja", "twoje", "twój", "ty", "tych", "tylko", "tym", "tys", "u", "w", "we",
    "więc", "wszystko", "wtedy", "www", "z", "za", "zawsze", "ze", "że", "żeby", "xd", "xdd",
    "hah", "haha", "hahah", "hahaha", "hehe", "hmm", "mhm", "noo", "nooo",
];

/// English stopwords.
pub const ENGLISH: &[&str] = &[
    "a", "about", "after", "again", "all", "also", "am", "an", "and", "any", "are", "as", "at",
    "be", "because", "been", "before", "being", "but", "by", "can", "could", "did", "do", "does",
    "doing", "don't", "down", "for", "from", "get", "got", "had", "has", "have", "having", "he",
    "her", "here", "hers", "him", "his", "how", "i", "i'm", "i've", "if", "in", "into", "is",
    "it", "it's", "its", "just", "like", "lol", "lmao", "me", "more", "most", "my", "no", "not",
    "now", "of", "off", "ok", "okay", "on", "once", "only", "or", "other", "our", "out", "over",
    "own", "really", "she", "so", "some", "such", "than", "that", "the", "their", "them", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "why", "will",
    "with", "would", "yeah", "yes", "you", "your", "yours",
];
