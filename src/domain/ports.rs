/// A record that lives in a collection with at most one default entry.
pub trait Defaultable: Clone + Send + Sync {
    fn id(&self) -> u64;
    fn set_id(&mut self, id: u64);
    fn is_default(&self) -> bool;
    fn set_default(&mut self, is_default: bool);
}

/// 初始資料來源，由擁有 store 的一方在第一次使用前呼叫一次
pub trait Bootstrap<T>: Send + Sync {
    fn initial_records(&self) -> Vec<T>;
}

impl<T: Clone + Send + Sync> Bootstrap<T> for Vec<T> {
    fn initial_records(&self) -> Vec<T> {
        self.clone()
    }
}
