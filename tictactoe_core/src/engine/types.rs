use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

/// 盤面上のマス（3x3）。
///
/// 各マスは 9bit マスクの異なる1ビットに対応し、勝ちラインの判定や
/// 占有の重複チェックを単一のビット演算で行えるようにしている。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Cell {
    /// 左上。
    NorthWest,
    /// 上。
    North,
    /// 右上。
    NorthEast,
    /// 左。
    West,
    /// 中央。
    Center,
    /// 右。
    East,
    /// 左下。
    SouthWest,
    /// 下。
    South,
    /// 右下。
    SouthEast,
}

impl Cell {
    /// 全マス（列挙順 = ビット順）。
    pub const ALL: [Self; 9] = [
        Self::NorthWest,
        Self::North,
        Self::NorthEast,
        Self::West,
        Self::Center,
        Self::East,
        Self::SouthWest,
        Self::South,
        Self::SouthEast,
    ];

    /// 盤の一辺の長さ。
    pub const BOARD_LEN: u8 = 3;

    /// そのマスを表すビット（`u16`）を返す。
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u16 {
        match self {
            Self::NorthWest => 0x001,
            Self::North => 0x002,
            Self::NorthEast => 0x004,
            Self::West => 0x008,
            Self::Center => 0x010,
            Self::East => 0x020,
            Self::SouthWest => 0x040,
            Self::South => 0x080,
            Self::SouthEast => 0x100,
        }
    }

    /// 0..=8 のインデックスから `Cell` を生成する。
    #[inline]
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::NorthWest),
            1 => Some(Self::North),
            2 => Some(Self::NorthEast),
            3 => Some(Self::West),
            4 => Some(Self::Center),
            5 => Some(Self::East),
            6 => Some(Self::SouthWest),
            7 => Some(Self::South),
            8 => Some(Self::SouthEast),
            _ => None,
        }
    }

    /// テンキー風の番号（1..=9、左上から行優先）から `Cell` を生成する。
    #[inline]
    #[must_use]
    pub const fn from_keypad(number: u8) -> Option<Self> {
        match number.checked_sub(1) {
            Some(index) => Self::from_index(index),
            None => None,
        }
    }

    /// ラベル（`"NW"`, `"center"` など）から `Cell` を生成する。大文字小文字は区別しない。
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|cell| cell.label().eq_ignore_ascii_case(label.trim()))
    }

    /// 盤面座標（x, y）から `Cell` を生成する。`y = 0` が上段。
    #[inline]
    #[must_use]
    pub const fn from_xy(x: u8, y: u8) -> Option<Self> {
        if x >= Self::BOARD_LEN || y >= Self::BOARD_LEN {
            return None;
        }

        let row = match y.checked_mul(Self::BOARD_LEN) {
            Some(value) => value,
            None => return None,
        };

        match row.checked_add(x) {
            Some(index) => Self::from_index(index),
            None => None,
        }
    }

    /// 0..=8 のインデックスを返す。
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::NorthWest => 0,
            Self::North => 1,
            Self::NorthEast => 2,
            Self::West => 3,
            Self::Center => 4,
            Self::East => 5,
            Self::SouthWest => 6,
            Self::South => 7,
            Self::SouthEast => 8,
        }
    }

    /// 表示用ラベル。
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NorthWest => "NW",
            Self::North => "N",
            Self::NorthEast => "NE",
            Self::West => "W",
            Self::Center => "center",
            Self::East => "E",
            Self::SouthWest => "SW",
            Self::South => "S",
            Self::SouthEast => "SE",
        }
    }

    /// x 座標（0..=2）を返す。
    #[inline]
    #[must_use]
    pub const fn x(self) -> u8 {
        match self.index().checked_rem(Self::BOARD_LEN) {
            Some(value) => value,
            None => u8::MIN,
        }
    }

    /// y 座標（0..=2）を返す。
    #[inline]
    #[must_use]
    pub const fn y(self) -> u8 {
        match self.index().checked_div(Self::BOARD_LEN) {
            Some(value) => value,
            None => u8::MIN,
        }
    }
}

impl fmt::Display for Cell {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// マスクに含まれるマスを列挙順に返す。
#[inline]
pub fn cells_in(mask: u16) -> impl Iterator<Item = Cell> {
    Cell::ALL
        .into_iter()
        .filter(move |cell| mask & cell.bit() != u16::MIN)
}

/// プレイヤーの記号。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Mark {
    /// ○。
    O,
    /// ×。
    X,
}

impl Mark {
    /// もう一方の記号を返す。
    #[inline]
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::O => Self::X,
            Self::X => Self::O,
        }
    }

    /// 表示用の1文字。
    #[inline]
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::O => 'O',
            Self::X => 'X',
        }
    }
}

impl fmt::Display for Mark {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// プレイヤーの操作主体。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PlayerKind {
    /// 探索エンジン。
    Engine,
    /// 人間（ローカル入力）。
    Human,
    /// リモート。
    Remote,
}

/// 払い出し元ごとの番号と、その中での通し番号の組。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
struct Serial {
    /// 払い出し元（`IdGenerator`）の番号。
    scope: u64,
    /// 払い出し元の中での通し番号（1 始まり）。
    index: u64,
}

impl fmt::Display for Serial {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.scope, self.index)
    }
}

/// プレイヤーの一意な識別子。別の `IdGenerator` が払い出したものとは一致しない。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct PlayerId(Serial);

impl PlayerId {
    /// 払い出し元の中での通し番号を返す。
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.index
    }

    /// 払い出し元の番号を返す。
    #[inline]
    #[must_use]
    pub const fn scope(self) -> u64 {
        self.0.scope
    }
}

impl fmt::Display for PlayerId {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// 盤面インスタンスの識別子（デバッグ用。対局には影響しない）。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BoardId(Serial);

impl fmt::Display for BoardId {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "board#{}", self.0)
    }
}

/// 同じ対局から派生した盤面が共有する識別子。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct OriginId(Serial);

impl fmt::Display for OriginId {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "origin#{}", self.0)
    }
}

/// プレイヤー。等価性は `id` のみで判定する。
#[derive(Copy, Clone, Debug)]
pub struct Player {
    /// 識別子。
    id: PlayerId,
    /// 操作主体。
    kind: PlayerKind,
    /// 記号。
    mark: Mark,
}

impl Player {
    /// 識別子を返す。
    #[inline]
    #[must_use]
    pub const fn id(self) -> PlayerId {
        self.id
    }

    /// 人間が操作するプレイヤーかを返す。
    #[inline]
    #[must_use]
    pub const fn is_human(self) -> bool {
        matches!(self.kind, PlayerKind::Human)
    }

    /// 操作主体を返す。
    #[inline]
    #[must_use]
    pub const fn kind(self) -> PlayerKind {
        self.kind
    }

    /// 記号を返す。
    #[inline]
    #[must_use]
    pub const fn mark(self) -> Mark {
        self.mark
    }
}

impl PartialEq for Player {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}

impl core::hash::Hash for Player {
    #[inline]
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Player {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.mark, self.id)
    }
}

/// 盤面内での席（0 = 先手席、1 = 後手席）。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Seat {
    /// 先手席。
    First,
    /// 後手席。
    Second,
}

impl Seat {
    /// 配列インデックス（0 / 1）を返す。
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }

    /// 相手側の席を返す。
    #[inline]
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

/// 払い出し元の番号。`std::thread::ThreadId` と同じく、生成のたびにプロセス内で1つ進める。
static NEXT_SCOPE: AtomicU64 = AtomicU64::new(0);

/// プレイヤー・盤面・対局の識別子を払い出すカウンタ。
///
/// 対局コンテキストが保持してコンストラクタへ明示的に渡す。
/// 識別子には払い出し元の番号が入るので、別の払い出し元の識別子とは衝突しない。
#[derive(Debug)]
pub struct IdGenerator {
    /// 盤面インスタンス用。
    boards: AtomicU64,
    /// 対局（origin）用。
    origins: AtomicU64,
    /// プレイヤー用。
    players: AtomicU64,
    /// この払い出し元の番号。
    scope: u64,
}

impl IdGenerator {
    /// 新しい盤面インスタンスの識別子を払い出す。
    #[inline]
    pub fn next_board_id(&self) -> BoardId {
        BoardId(self.serial(&self.boards))
    }

    /// 新しい対局の識別子を払い出す。
    #[inline]
    pub fn next_origin_id(&self) -> OriginId {
        OriginId(self.serial(&self.origins))
    }

    /// 新しい払い出し元の番号を取り、カウンタを 0 から開始する。
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            boards: AtomicU64::new(0),
            origins: AtomicU64::new(0),
            players: AtomicU64::new(0),
            scope: bump(&NEXT_SCOPE),
        }
    }

    /// 新しい識別子を持つプレイヤーを生成する。
    #[inline]
    pub fn player(&self, mark: Mark, kind: PlayerKind) -> Player {
        Player {
            id: PlayerId(self.serial(&self.players)),
            kind,
            mark,
        }
    }

    /// この払い出し元の番号を返す。
    #[inline]
    #[must_use]
    pub const fn scope(&self) -> u64 {
        self.scope
    }

    /// `counter` を進めて、この払い出し元の通し番号を作る。
    fn serial(&self, counter: &AtomicU64) -> Serial {
        Serial {
            scope: self.scope,
            index: bump(counter),
        }
    }
}

impl Default for IdGenerator {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// カウンタを1進め、進めた後の値を返す（1 始まり）。
fn bump(counter: &AtomicU64) -> u64 {
    counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
}
