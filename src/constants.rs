//! Watch-lists and tuning constants.
//!
//! Watch-list membership tracks NSE index/derivative eligibility and is
//! revised manually when the exchange reshuffles constituents.

/// Suffix Yahoo Finance uses for NSE-listed symbols
pub const NSE_SUFFIX: &str = ".NS";

/// Moving-average windows computed for a single-ticker snapshot (trading days)
pub const MA_WINDOWS: &[usize] = &[5, 20, 50, 100, 200];

/// Number of weekly samples in the long-horizon average
pub const LONG_AVERAGE_WEEKS: usize = 200;

/// Weekly fetch window, slightly over 200 weeks so the full average is
/// available even when the provider trims leading rows
pub const WEEKLY_FETCH_WEEKS: i64 = 220;

/// Daily lookback used for the latest-price fetch and for resolution probes.
/// Calendar days, wide enough to always contain recent trading sessions.
pub const LATEST_PRICE_LOOKBACK_DAYS: i64 = 14;

/// Daily lookback for the charting series and the computed sub-averages
pub const DAILY_CHART_LOOKBACK_DAYS: i64 = 365;

/// Maximum concurrent in-flight symbol fetches during a watch-list batch
pub const WATCHLIST_CONCURRENCY: usize = 10;

/// Primary and fallback hosts for the Yahoo chart API.
/// The per-symbol fallback host is retried once when the primary returns an
/// empty series.
pub const CHART_HOST_PRIMARY: &str = "https://query1.finance.yahoo.com";
pub const CHART_HOST_FALLBACK: &str = "https://query2.finance.yahoo.com";

/// Quote API host (precomputed 50d/200d averages, 52-week range)
pub const QUOTE_HOST: &str = "https://query1.finance.yahoo.com";

/// NSE equity directory snapshot (symbol, company name)
pub const DIRECTORY_URL: &str =
    "https://archives.nseindia.com/content/equities/EQUITY_L.csv";

/// Maximum age of the cached directory snapshot before a refresh is attempted
pub const DIRECTORY_MAX_AGE_SECS: u64 = 3600;

/// Default number of rows returned by directory search
pub const SEARCH_DEFAULT_LIMIT: usize = 10;

/// Upper bound on directory search results regardless of requested limit
pub const SEARCH_MAX_LIMIT: usize = 50;

/// F&O (derivatives-eligible) stocks
pub const FNO_STOCKS: &[&str] = &[
    "360ONE", "ABB", "ADANIENSOL", "ADANIENT", "ADANIGREEN", "ADANIPORTS",
    "ABCAPITAL", "ALKEM", "AMBER", "AMBUJACEM", "ANGELONE", "APLAPOLLO",
    "APOLLOHOSP", "ASHOKLEY", "ASIANPAINT", "ASTRAL", "AUBANK", "AUROPHARMA",
    "DMART", "AXISBANK", "BAJAJ-AUTO", "BAJFINANCE", "BAJAJFINSV", "BAJAJHLDNG",
    "BANDHANBNK", "BANKBARODA", "BANKINDIA", "BDL", "BEL", "BHARATFORG",
    "BHEL", "BPCL", "BHARTIARTL", "BIOCON", "BLUESTARCO", "BOSCHLTD",
    "BRITANNIA", "BSE", "CANBK", "CDSL", "CGPOWER", "CHOLAFIN",
    "CIPLA", "COALINDIA", "COFORGE", "COLPAL", "CAMS", "CONCOR",
    "CROMPTON", "CUMMINSIND", "DABUR", "DALBHARAT", "DELHIVERY", "DIVISLAB",
    "DIXON", "DLF", "DRREDDY", "EICHERMOT", "EXIDEIND", "FEDERALBNK",
    "FORTIS", "NYKAA", "GAIL", "GLENMARK", "GMRAIRPORT", "GODREJCP",
    "GODREJPROP", "GRASIM", "HAVELLS", "HCLTECH", "HDFCAMC",
    "HDFCBANK", "HDFCLIFE", "HEROMOTOCO", "HINDALCO", "HAL",
    "HINDPETRO", "HINDUNILVR", "HINDZINC", "POWERINDIA", "HUDCO",
    "ICICIBANK", "ICICIGI", "ICICIPRULI", "IDFCFIRSTB", "INDIANB",
    "IEX", "INDHOTEL", "IOC", "IRCTC", "IRFC", "IREDA",
    "INDUSTOWER", "INDUSINDBK", "NAUKRI", "INFY", "INOXWIND",
    "INDIGO", "ITC", "JINDALSTEL", "JIOFIN", "JSWENERGY", "JSWSTEEL",
    "JUBLFOOD", "KALYANKJIL", "KAYNES", "KEI", "KFINTECH",
    "KOTAKBANK", "KPITTECH", "LTF", "LT", "LAURUSLABS",
    "LICHSGFIN", "LICI", "LTIM", "LUPIN", "LODHA",
    "M&M", "MANAPPURAM", "MANKIND", "MARICO", "MARUTI",
    "MFSL", "MAXHEALTH", "MAZDOCK", "MPHASIS", "MCX",
    "MUTHOOTFIN", "NATIONALUM", "NBCC", "NESTLEIND", "NHPC",
    "NMDC", "NTPC", "NUVAMA", "OBEROIRLTY", "ONGC",
    "OIL", "PAYTM", "OFSS", "PIIND", "PAGEIND",
    "PATANJALI", "POLICYBZR", "PERSISTENT", "PETRONET", "PGEL",
    "PHOENIXLTD", "PIDILITIND", "PPLPHARMA", "PNBHOUSING", "POLYCAB",
    "PFC", "POWERGRID", "PREMIERENE", "PRESTIGE", "PNB",
    "RVNL", "RBLBANK", "RECLTD", "RELIANCE", "SAMMAANCAP",
    "MOTHERSON", "SBICARD", "SBILIFE", "SHREECEM", "SHRIRAMFIN",
    "SIEMENS", "SOLARINDS", "SONACOMS", "SRF", "SBIN",
    "SAIL", "SUNPHARMA", "SUPREMEIND", "SUZLON", "SWIGGY",
    "SYNGENE", "TCS", "TATACONSUM", "TATAELXSI", "TMPV", "TMCV",
    "TATAPOWER", "TATASTEEL", "TATATECH", "TECHM", "TITAN",
    "TORNTPHARM", "TORNTPOWER", "TRENT", "TIINDIA", "TVSMOTOR",
    "ULTRACEMCO", "UNIONBANK", "UNITDSPR", "UNOMINDA", "UPL",
    "VBL", "VEDL", "IDEA", "VOLTAS", "WAAREEENER",
    "WIPRO", "YESBANK", "ETERNAL", "ZYDUSLIFE",
];

/// NIFTY 50 constituents
pub const NIFTY_50_STOCKS: &[&str] = &[
    "ADANIENT", "ADANIPORTS", "APOLLOHOSP", "ASIANPAINT", "AXISBANK",
    "BAJAJ-AUTO", "BAJFINANCE", "BAJAJFINSV", "BEL", "BHARTIARTL",
    "CIPLA", "COALINDIA", "DRREDDY", "EICHERMOT", "ETERNAL",
    "GRASIM", "HCLTECH", "HDFCBANK", "HDFCLIFE", "HEROMOTOCO",
    "HINDALCO", "HINDUNILVR", "ICICIBANK", "INDUSINDBK", "INFY",
    "ITC", "JIOFIN", "JSWSTEEL", "KOTAKBANK", "LT",
    "M&M", "MARUTI", "NESTLEIND", "NTPC", "ONGC",
    "POWERGRID", "RELIANCE", "SBILIFE", "SBIN", "SHRIRAMFIN",
    "SUNPHARMA", "TCS", "TATACONSUM", "TATAMOTORS", "TATASTEEL",
    "TECHM", "TITAN", "TRENT", "ULTRACEMCO", "WIPRO",
];

/// NIFTY Next 50 constituents
pub const NIFTY_NEXT_50_STOCKS: &[&str] = &[
    "ABB", "ADANIENSOL", "ADANIGREEN", "ADANIPOWER", "AMBUJACEM",
    "BAJAJHFL", "BAJAJHLDNG", "BANKBARODA", "BPCL", "BRITANNIA",
    "BOSCHLTD", "CANBK", "CGPOWER", "CHOLAFIN", "DIVISLAB",
    "DLF", "DMART", "ENRIN", "GAIL", "GODREJCP",
    "HAL", "HAVELLS", "HINDZINC", "HYUNDAI", "ICICIGI",
    "INDHOTEL", "IOC", "IRFC", "JINDALSTEL", "LICI",
    "LODHA", "LTIM", "MAZDOCK", "MOTHERSON", "NAUKRI",
    "PFC", "PIDILITIND", "PNB", "RECLTD", "SHREECEM",
    "SIEMENS", "SOLARINDS", "TATAPOWER", "TORNTPHARM", "TVSMOTOR",
    "UNITDSPR", "VBL", "VEDL", "ZYDUSLIFE",
];
