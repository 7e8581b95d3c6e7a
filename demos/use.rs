use avl_set::AvlTree;

fn main() {
    let mut tree = AvlTree::from(['a', 'b', 'c', 'd']);
    tree.remove(&'d');
    tree.print();

    let mut numbers: AvlTree<i32> = (1..=7).collect();
    assert_eq!(numbers.height(), 3);
    numbers.remove(&4);
    assert!(!numbers.contains(&4));
    println!("{numbers:?} (height {})", numbers.height());
}
